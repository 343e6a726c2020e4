// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (issuing codes, rate limiting) lives in the domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseSmsService, BaseOtpStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domains::contact::models::{ContactSubmission, NewContactSubmission};
use crate::domains::otp::models::OtpEntry;

// =============================================================================
// Clock (Infrastructure - wall time)
// =============================================================================

pub trait BaseClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// =============================================================================
// OTP Code Generator
// =============================================================================

pub trait BaseCodeGenerator: Send + Sync {
    /// Produce a 6-digit numeric code
    fn generate(&self) -> String;
}

// =============================================================================
// SMS Trait (Infrastructure - OTP delivery)
// =============================================================================

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Send a text message to a phone number
    async fn send_sms(&self, to: &str, body: &str) -> Result<()>;
}

// =============================================================================
// Email Trait (Infrastructure - contact relay delivery)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait BaseEmailService: Send + Sync {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<()>;
}

// =============================================================================
// OTP Store (Infrastructure - keyed by phone number)
// =============================================================================

#[async_trait]
pub trait BaseOtpStore: Send + Sync {
    async fn get(&self, phone: &str) -> Result<Option<OtpEntry>>;

    /// Store an entry, replacing any prior entry for the same phone
    async fn set(&self, entry: OtpEntry) -> Result<()>;

    async fn delete(&self, phone: &str) -> Result<()>;

    /// Delete the entry for `entry.phone` only if it is still exactly `entry`.
    /// Returns false when it was already consumed or replaced.
    async fn delete_matching(&self, entry: &OtpEntry) -> Result<bool>;

    /// Evict entries whose expiry is before `now`. Returns the number removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}

// =============================================================================
// Contact Submission Store (Infrastructure - rate limit log)
// =============================================================================

/// Per-identity caps over the trailing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionLimits {
    pub per_email: i64,
    pub per_address: i64,
}

/// Outcome of an atomic count-then-insert
#[derive(Debug, Clone, PartialEq)]
pub enum Reservation {
    Reserved(ContactSubmission),
    EmailLimited,
    AddressLimited,
}

#[async_trait]
pub trait BaseSubmissionStore: Send + Sync {
    async fn insert(&self, submission: NewContactSubmission) -> Result<ContactSubmission>;

    async fn count_by_email_since(&self, email: &str, since: DateTime<Utc>) -> Result<i64>;

    async fn count_by_address_since(&self, address: &str, since: DateTime<Utc>) -> Result<i64>;

    /// Count both windows and insert only if both are under their limits, as one atomic step.
    async fn reserve(
        &self,
        submission: NewContactSubmission,
        since: DateTime<Utc>,
        limits: SubmissionLimits,
    ) -> Result<Reservation>;

    /// Remove a reserved record (used when delivery fails)
    async fn release(&self, submission: &ContactSubmission) -> Result<()>;

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

// =============================================================================
// Visitor Store (Infrastructure - unique visitor counter)
// =============================================================================

#[async_trait]
pub trait BaseVisitorStore: Send + Sync {
    /// Record a visitor hash if unseen; returns the total distinct count
    async fn track(&self, visitor_hash: &str) -> Result<i64>;

    async fn count(&self) -> Result<i64>;
}
