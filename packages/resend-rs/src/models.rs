use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailResponse {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendErrorResponse {
    pub status_code: Option<u16>,
    pub message: String,
    pub name: Option<String>,
}
