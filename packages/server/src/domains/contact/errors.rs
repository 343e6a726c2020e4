use thiserror::Error;

use super::MAX_SUBMISSIONS_PER_EMAIL;

/// Which counter tripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitScope {
    Email,
    Address,
}

/// Failures of the contact relay
#[derive(Error, Debug)]
pub enum ContactError {
    /// Honeypot filled in. Deliberately vague.
    #[error("Invalid submission")]
    InvalidSubmission,

    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("{}", rate_limit_message(.0))]
    RateLimited(RateLimitScope),

    #[error("Service temporarily unavailable: {0}")]
    ServiceUnavailable(#[source] anyhow::Error),
}

impl ContactError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

fn rate_limit_message(scope: &RateLimitScope) -> String {
    match scope {
        RateLimitScope::Email => format!(
            "Too many submissions. Please try again later. Limit: {} submissions per hour.",
            MAX_SUBMISSIONS_PER_EMAIL
        ),
        RateLimitScope::Address => {
            "Too many submissions from your network. Please try again later.".to_string()
        }
    }
}
