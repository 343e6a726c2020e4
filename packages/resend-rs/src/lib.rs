// Minimal client for the Resend transactional email API.
// https://resend.com/docs/api-reference/emails/send-email

use std::time::Duration;

pub mod models;
use reqwest::Client;
use tracing::error;

pub use crate::models::{EmailRequest, EmailResponse};
use crate::models::ResendErrorResponse;

const API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, thiserror::Error)]
pub enum ResendError {
    #[error("request to Resend failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Resend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("error parsing Resend response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ResendOptions {
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct ResendService {
    options: ResendOptions,
    client: Client,
}

impl ResendService {
    pub fn new(options: ResendOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Bound every request to `timeout`.
    pub fn with_timeout(options: ResendOptions, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { options, client }
    }

    pub async fn send_email(&self, request: &EmailRequest) -> Result<EmailResponse, ResendError> {
        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.options.api_key)
            .json(request)
            .send()
            .await
            .map_err(ResendError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendErrorResponse>(&raw)
                .map(|e| e.message)
                .unwrap_or(raw);
            error!(status = status.as_u16(), %message, "Resend rejected email");
            return Err(ResendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<EmailResponse>()
            .await
            .map_err(ResendError::Decode)
    }
}
