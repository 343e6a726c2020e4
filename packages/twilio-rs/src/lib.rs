// Minimal client for the Twilio Programmable Messaging API.
// https://www.twilio.com/docs/messaging/api/message-resource#create-a-message-resource

use std::collections::HashMap;
use std::time::Duration;

pub mod models;
use reqwest::{header, Client};
use tracing::error;

use crate::models::{MessageResponse, TwilioErrorResponse};

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Twilio returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("error parsing Twilio response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 format (or a messaging service SID)
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Bound every request to `timeout`.
    pub fn with_timeout(options: TwilioOptions, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { options, client }
    }

    fn messages_url(&self) -> String {
        format!(
            "{base}/Accounts/{sid}/Messages.json",
            base = API_BASE,
            sid = self.options.account_sid
        )
    }

    pub async fn send_sms(&self, to: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", to);
        form_body.insert("From", &self.options.from);
        form_body.insert("Body", body);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .headers(headers)
            .form(&form_body)
            .send()
            .await
            .map_err(TwilioError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorResponse>(&raw)
                .map(|e| e.message)
                .unwrap_or(raw);
            error!(status = status.as_u16(), %message, "Twilio rejected message");
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(TwilioError::Decode)
    }
}
