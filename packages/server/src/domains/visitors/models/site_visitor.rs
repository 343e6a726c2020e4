use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A distinct visitor, identified by the SHA256 of the browser-held id
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SiteVisitor {
    pub visitor_hash: String,
    pub first_seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorStats {
    pub visitor_count: i64,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl SiteVisitor {
    /// Insert the hash unless already present. Returns true if it was new.
    pub async fn record(visitor_hash: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO site_visitors (visitor_hash, first_seen_at)
            VALUES ($1, NOW())
            ON CONFLICT (visitor_hash) DO NOTHING
            "#,
        )
        .bind(visitor_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM site_visitors")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
