//! Store implementations behind the Base*Store traits
//!
//! In-memory variants serve development and tests; Postgres variants are used
//! whenever DATABASE_URL is configured. The OTP store is always in-memory.

pub mod otp_store;
pub mod submission_store;
pub mod visitor_store;

pub use otp_store::InMemoryOtpStore;
pub use submission_store::{InMemorySubmissionStore, PostgresSubmissionStore};
pub use visitor_store::{InMemoryVisitorStore, PostgresVisitorStore};
