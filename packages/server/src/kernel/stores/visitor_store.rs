use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashSet;
use sqlx::PgPool;

use crate::domains::visitors::SiteVisitor;
use crate::kernel::BaseVisitorStore;

/// Visitor hashes in the `site_visitors` table
#[derive(Clone)]
pub struct PostgresVisitorStore {
    pool: PgPool,
}

impl PostgresVisitorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseVisitorStore for PostgresVisitorStore {
    async fn track(&self, visitor_hash: &str) -> Result<i64> {
        SiteVisitor::record(visitor_hash, &self.pool).await?;
        SiteVisitor::count(&self.pool).await
    }

    async fn count(&self) -> Result<i64> {
        SiteVisitor::count(&self.pool).await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryVisitorStore {
    seen: DashSet<String>,
}

impl InMemoryVisitorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseVisitorStore for InMemoryVisitorStore {
    async fn track(&self, visitor_hash: &str) -> Result<i64> {
        self.seen.insert(visitor_hash.to_string());
        Ok(self.seen.len() as i64)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.seen.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_track_is_idempotent() {
        let store = InMemoryVisitorStore::new();

        assert_eq!(store.track("a").await.unwrap(), 1);
        assert_eq!(store.track("a").await.unwrap(), 1);
        assert_eq!(store.track("b").await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
