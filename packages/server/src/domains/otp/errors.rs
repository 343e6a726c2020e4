use thiserror::Error;

/// Failures of the OTP issue/verify flow
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("{0}")]
    Validation(String),

    #[error("No OTP requested for this phone")]
    NotFound,

    #[error("OTP expired")]
    Expired,

    #[error("Invalid OTP")]
    Mismatch,

    #[error("Failed to send OTP: {0}")]
    Delivery(#[source] anyhow::Error),

    #[error("OTP store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}
