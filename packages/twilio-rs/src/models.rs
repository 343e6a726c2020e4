use serde::{Deserialize, Serialize};

/// Subset of the Message resource returned on create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: Option<String>,
    pub from: Option<String>,
    pub date_created: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioErrorResponse {
    pub code: Option<i64>,
    pub message: String,
    pub more_info: Option<String>,
    pub status: Option<u16>,
}
