//! Contact domain - relays portfolio contact form submissions to the site owner
//!
//! Pipeline per submission:
//!   honeypot → field validation → reserve a log row under both rate limits
//!   → email delivery (reservation released on failure) → best-effort prune
//!
//! Rate limits are recomputed from the persisted submission log on every
//! request; nothing is cached.

pub mod actions;
pub mod email;
pub mod errors;
pub mod models;
pub mod validation;

pub use actions::submit_contact;
pub use errors::{ContactError, RateLimitScope};
pub use validation::{ContactForm, ValidatedContact};

use chrono::Duration;

/// Accepted submissions allowed per email within the window
pub const MAX_SUBMISSIONS_PER_EMAIL: i64 = 3;

/// Accepted submissions allowed per source address within the window
pub const MAX_SUBMISSIONS_PER_ADDRESS: i64 = 5;

pub const RATE_LIMIT_WINDOW_SECS: i64 = 60 * 60;

pub fn rate_limit_window() -> Duration {
    Duration::seconds(RATE_LIMIT_WINDOW_SECS)
}
