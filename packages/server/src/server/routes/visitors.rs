//! Visitor counter endpoints.
//!
//! POST /api/visitors { visitor_id } → 200 { visitor_count }
//! GET  /api/visitors                → 200 { visitor_count }

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::text_field;
use crate::domains::visitors::{track_visitor, visitor_count, VisitorError, VisitorStats};
use crate::server::app::AxumAppState;

#[derive(Debug, Default, Deserialize)]
pub struct TrackVisitorRequest {
    #[serde(default)]
    pub visitor_id: Option<Value>,
}

impl IntoResponse for VisitorError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            VisitorError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            VisitorError::ServiceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable. Please try again later.".to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub async fn track_visitor_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Option<Json<TrackVisitorRequest>>,
) -> Result<Json<VisitorStats>, VisitorError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let visitor_id = text_field(&request.visitor_id).unwrap_or_default();

    Ok(Json(track_visitor(visitor_id, &state.deps).await?))
}

pub async fn visitor_count_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<VisitorStats>, VisitorError> {
    Ok(Json(visitor_count(&state.deps).await?))
}
