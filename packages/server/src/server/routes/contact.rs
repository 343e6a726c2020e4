//! Contact relay endpoint.
//!
//! POST /api/contact { name, email, message, website? }
//!   → 200 { success: true }
//!   → 400 { success: false, error } validation / honeypot
//!   → 429 { success: false, error } rate limited
//!   → 503 { success: false, error } upstream unavailable

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{text_field, ClientInfo};
use crate::domains::contact::{submit_contact, ContactError, ContactForm};
use crate::server::app::AxumAppState;

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub website: Option<Value>,
}

impl ContactRequest {
    fn into_form(self) -> ContactForm {
        // Any non-string honeypot value still counts as filled
        let website = match self.website {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };

        ContactForm {
            name: text_field(&self.name).map(String::from),
            email: text_field(&self.email).map(String::from),
            message: text_field(&self.message).map(String::from),
            website,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = match &self {
            ContactError::InvalidSubmission | ContactError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ContactError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ContactError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        // Upstream detail stays in the server log
        let message = match &self {
            ContactError::ServiceUnavailable(_) => {
                "Service temporarily unavailable. Please try again later.".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ContactResponse {
                success: false,
                error: Some(message),
            }),
        )
            .into_response()
    }
}

pub async fn contact_handler(
    Extension(state): Extension<AxumAppState>,
    client: Option<Extension<ClientInfo>>,
    payload: Option<Json<ContactRequest>>,
) -> Result<Json<ContactResponse>, ContactError> {
    let client = client.map(|Extension(info)| info).unwrap_or_default();
    let form = payload
        .map(|Json(request)| request)
        .unwrap_or_default()
        .into_form();

    submit_contact(&form, &client, &state.deps).await?;

    Ok(Json(ContactResponse {
        success: true,
        error: None,
    }))
}
