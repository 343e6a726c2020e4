//! OTP endpoints.
//!
//! POST /api/send-otp    { phone }        → 200 { success, message } | 400 | 500
//! POST /api/verify-otp  { phone, code }  → 200 { success } | 400

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::common::text_field;
use crate::domains::otp::{send_otp, verify_otp, OtpError};
use crate::server::app::AxumAppState;

/// Fields are kept as raw JSON so that non-string values get the same 400 as missing ones
#[derive(Debug, Default, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct OtpSentResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OtpVerifiedResponse {
    pub success: bool,
}

impl IntoResponse for OtpError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            OtpError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            OtpError::NotFound | OtpError::Expired | OtpError::Mismatch => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            OtpError::Delivery(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send OTP".to_string(),
            ),
            OtpError::Unavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Service temporarily unavailable. Please try again later.".to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Issue a code. A malformed body is treated like an empty one.
pub async fn send_otp_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Option<Json<SendOtpRequest>>,
) -> Result<Json<OtpSentResponse>, OtpError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let phone = text_field(&request.phone)
        .ok_or_else(|| OtpError::Validation("Phone number is required".to_string()))?;

    send_otp(phone, &state.deps).await?;

    Ok(Json(OtpSentResponse {
        success: true,
        message: "OTP sent",
    }))
}

pub async fn verify_otp_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> Result<Json<OtpVerifiedResponse>, OtpError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let (Some(phone), Some(code)) = (text_field(&request.phone), text_field(&request.code)) else {
        return Err(OtpError::Validation(
            "Phone and code are required".to_string(),
        ));
    };

    verify_otp(phone, code, &state.deps).await?;

    Ok(Json(OtpVerifiedResponse { success: true }))
}
