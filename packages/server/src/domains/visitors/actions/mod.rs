//! Visitors domain actions

use tracing::{debug, error};

use crate::common::hash_identifier;
use crate::domains::visitors::errors::VisitorError;
use crate::domains::visitors::models::VisitorStats;
use crate::domains::visitors::VISITOR_ID_MAX_CHARS;
use crate::kernel::{with_timeout, ServerDeps};

/// Record a visitor id (idempotent) and return the distinct visitor total
pub async fn track_visitor(visitor_id: &str, deps: &ServerDeps) -> Result<VisitorStats, VisitorError> {
    let visitor_id = visitor_id.trim();
    if visitor_id.is_empty() {
        return Err(VisitorError::Validation("Visitor id is required".to_string()));
    }
    if visitor_id.chars().count() > VISITOR_ID_MAX_CHARS {
        return Err(VisitorError::Validation(format!(
            "Visitor id must be at most {} characters",
            VISITOR_ID_MAX_CHARS
        )));
    }

    let visitor_hash = hash_identifier(visitor_id);
    let visitor_count = with_timeout(
        deps.upstream_timeout,
        "visitor track",
        deps.visitors.track(&visitor_hash),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Error tracking visitor");
        VisitorError::ServiceUnavailable(e)
    })?;

    debug!(visitor_count, "Visitor tracked");
    Ok(VisitorStats { visitor_count })
}

/// Current distinct visitor total, without recording anything
pub async fn visitor_count(deps: &ServerDeps) -> Result<VisitorStats, VisitorError> {
    let visitor_count = with_timeout(deps.upstream_timeout, "visitor count", deps.visitors.count())
        .await
        .map_err(|e| {
            error!(error = %e, "Error fetching visitor count");
            VisitorError::ServiceUnavailable(e)
        })?;

    Ok(VisitorStats { visitor_count })
}
