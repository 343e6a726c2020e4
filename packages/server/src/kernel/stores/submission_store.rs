use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::domains::contact::models::{ContactSubmission, NewContactSubmission};
use crate::kernel::{BaseSubmissionStore, Reservation, SubmissionLimits};

// =============================================================================
// Postgres
// =============================================================================

/// Submission log in the `contact_submissions` table
#[derive(Clone)]
pub struct PostgresSubmissionStore {
    pool: PgPool,
}

impl PostgresSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseSubmissionStore for PostgresSubmissionStore {
    async fn insert(&self, submission: NewContactSubmission) -> Result<ContactSubmission> {
        ContactSubmission::insert(submission, &self.pool).await
    }

    async fn count_by_email_since(&self, email: &str, since: DateTime<Utc>) -> Result<i64> {
        ContactSubmission::count_by_email_since(email, since, &self.pool).await
    }

    async fn count_by_address_since(&self, address: &str, since: DateTime<Utc>) -> Result<i64> {
        ContactSubmission::count_by_address_since(address, since, &self.pool).await
    }

    /// Advisory locks serialize reservations per email and per address for the
    /// life of the transaction. Email is always locked before address.
    async fn reserve(
        &self,
        submission: NewContactSubmission,
        since: DateTime<Utc>,
        limits: SubmissionLimits,
    ) -> Result<Reservation> {
        let mut tx = self.pool.begin().await?;

        ContactSubmission::lock_key(&format!("contact:email:{}", submission.email), &mut *tx)
            .await?;
        ContactSubmission::lock_key(&format!("contact:ip:{}", submission.ip_address), &mut *tx)
            .await?;

        let by_email =
            ContactSubmission::count_by_email_since(&submission.email, since, &mut *tx).await?;
        if by_email >= limits.per_email {
            tx.rollback().await?;
            return Ok(Reservation::EmailLimited);
        }

        let by_address =
            ContactSubmission::count_by_address_since(&submission.ip_address, since, &mut *tx)
                .await?;
        if by_address >= limits.per_address {
            tx.rollback().await?;
            return Ok(Reservation::AddressLimited);
        }

        let row = ContactSubmission::insert(submission, &mut *tx).await?;
        tx.commit().await?;
        Ok(Reservation::Reserved(row))
    }

    async fn release(&self, submission: &ContactSubmission) -> Result<()> {
        ContactSubmission::delete(submission.id, &self.pool).await
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        ContactSubmission::delete_older_than(cutoff, &self.pool).await
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Submission log held in process memory
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    rows: Mutex<Vec<ContactSubmission>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row
    pub async fn all(&self) -> Vec<ContactSubmission> {
        self.rows.lock().await.clone()
    }
}

fn count_matching(
    rows: &[ContactSubmission],
    since: DateTime<Utc>,
    matches: impl Fn(&ContactSubmission) -> bool,
) -> i64 {
    rows.iter()
        .filter(|row| row.submitted_at >= since && matches(row))
        .count() as i64
}

#[async_trait]
impl BaseSubmissionStore for InMemorySubmissionStore {
    async fn insert(&self, submission: NewContactSubmission) -> Result<ContactSubmission> {
        let row = submission.into_submission();
        self.rows.lock().await.push(row.clone());
        Ok(row)
    }

    async fn count_by_email_since(&self, email: &str, since: DateTime<Utc>) -> Result<i64> {
        let rows = self.rows.lock().await;
        Ok(count_matching(&rows, since, |row| row.email == email))
    }

    async fn count_by_address_since(&self, address: &str, since: DateTime<Utc>) -> Result<i64> {
        let rows = self.rows.lock().await;
        Ok(count_matching(&rows, since, |row| row.ip_address == address))
    }

    async fn reserve(
        &self,
        submission: NewContactSubmission,
        since: DateTime<Utc>,
        limits: SubmissionLimits,
    ) -> Result<Reservation> {
        let mut rows = self.rows.lock().await;

        if count_matching(&rows, since, |row| row.email == submission.email) >= limits.per_email {
            return Ok(Reservation::EmailLimited);
        }
        if count_matching(&rows, since, |row| row.ip_address == submission.ip_address)
            >= limits.per_address
        {
            return Ok(Reservation::AddressLimited);
        }

        let row = submission.into_submission();
        rows.push(row.clone());
        Ok(Reservation::Reserved(row))
    }

    async fn release(&self, submission: &ContactSubmission) -> Result<()> {
        self.rows.lock().await.retain(|row| row.id != submission.id);
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| row.submitted_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }
}
