use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// One accepted contact form submission, kept only for rate limiting
///
/// Rows are never updated. They are deleted once older than the rate limit window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub email: String,
    pub ip_address: String,
    pub user_agent: String,
    pub submitted_at: DateTime<Utc>,
}

/// Input for logging a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactSubmission {
    pub email: String,
    pub ip_address: String,
    pub user_agent: String,
    pub submitted_at: DateTime<Utc>,
}

impl NewContactSubmission {
    pub fn into_submission(self) -> ContactSubmission {
        ContactSubmission {
            id: Uuid::new_v4(),
            email: self.email,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            submitted_at: self.submitted_at,
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl ContactSubmission {
    pub async fn insert<'e, E>(submission: NewContactSubmission, executor: E) -> Result<Self>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, ContactSubmission>(
            r#"
            INSERT INTO contact_submissions (id, email, ip_address, user_agent, submitted_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(submission.email)
        .bind(submission.ip_address)
        .bind(submission.user_agent)
        .bind(submission.submitted_at)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn count_by_email_since<'e, E>(
        email: &str,
        since: DateTime<Utc>,
        executor: E,
    ) -> Result<i64>
    where
        E: PgExecutor<'e>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_submissions WHERE email = $1 AND submitted_at >= $2",
        )
        .bind(email)
        .bind(since)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    pub async fn count_by_address_since<'e, E>(
        ip_address: &str,
        since: DateTime<Utc>,
        executor: E,
    ) -> Result<i64>
    where
        E: PgExecutor<'e>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_submissions WHERE ip_address = $1 AND submitted_at >= $2",
        )
        .bind(ip_address)
        .bind(since)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    /// Take a transaction-scoped advisory lock on an arbitrary key
    pub async fn lock_key<'e, E>(key: &str, executor: E) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(key)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(id: Uuid, executor: E) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("DELETE FROM contact_submissions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_older_than<'e, E>(cutoff: DateTime<Utc>, executor: E) -> Result<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM contact_submissions WHERE submitted_at < $1")
            .bind(cutoff)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
