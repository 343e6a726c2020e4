//! OTP domain - phone verification via short-lived one-time passcodes
//!
//! Responsibilities:
//! - Issue a 6-digit code per phone number with a five minute expiry
//! - Verify a submitted code, consuming the entry on success or expiry
//!
//! One live entry per phone. A new issuance overwrites the previous one.

pub mod actions;
pub mod errors;
pub mod models;

pub use actions::{send_otp, verify_otp};
pub use errors::OtpError;
pub use models::{OtpEntry, RandomCodeGenerator, OTP_TTL_SECS};
