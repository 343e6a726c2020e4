//! Postgres-backed stores against a real database.
//!
//! Needs Docker. Run with: cargo test --test postgres_store_tests -- --ignored

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::TestHarness;
use portfolio_core::domains::contact::models::NewContactSubmission;
use portfolio_core::kernel::{
    BaseSubmissionStore, BaseVisitorStore, PostgresSubmissionStore, PostgresVisitorStore,
    Reservation, SubmissionLimits,
};
use test_context::test_context;
use uuid::Uuid;

const LIMITS: SubmissionLimits = SubmissionLimits {
    per_email: 3,
    per_address: 5,
};

/// Unique email and address so tests sharing the database never collide
fn unique_sender() -> (String, String) {
    let tag = Uuid::new_v4().simple().to_string();
    (format!("{}@example.com", tag), format!("test-{}", tag))
}

fn submission(email: &str, ip: &str) -> NewContactSubmission {
    NewContactSubmission {
        email: email.to_string(),
        ip_address: ip.to_string(),
        user_agent: "test-agent".to_string(),
        submitted_at: Utc::now(),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn reserve_stops_at_email_limit(ctx: &TestHarness) {
    let store = PostgresSubmissionStore::new(ctx.db_pool.clone());
    let (email, ip) = unique_sender();
    let since = Utc::now() - Duration::hours(1);

    for _ in 0..3 {
        let outcome = store
            .reserve(submission(&email, &ip), since, LIMITS)
            .await
            .unwrap();
        assert!(matches!(outcome, Reservation::Reserved(_)));
    }

    let outcome = store
        .reserve(submission(&email, &ip), since, LIMITS)
        .await
        .unwrap();
    assert_eq!(outcome, Reservation::EmailLimited);
    assert_eq!(store.count_by_email_since(&email, since).await.unwrap(), 3);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn concurrent_reservations_respect_limit(ctx: &TestHarness) {
    let store = Arc::new(PostgresSubmissionStore::new(ctx.db_pool.clone()));
    let (email, ip) = unique_sender();
    let since = Utc::now() - Duration::hours(1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let sub = submission(&email, &ip);
            tokio::spawn(async move { store.reserve(sub, since, LIMITS).await.unwrap() })
        })
        .collect();

    let mut reserved = 0;
    for handle in handles {
        if matches!(handle.await.unwrap(), Reservation::Reserved(_)) {
            reserved += 1;
        }
    }
    assert_eq!(reserved, 3);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn release_and_prune_remove_rows(ctx: &TestHarness) {
    let store = PostgresSubmissionStore::new(ctx.db_pool.clone());
    let (email, ip) = unique_sender();
    let since = Utc::now() - Duration::hours(1);

    let Reservation::Reserved(row) = store
        .reserve(submission(&email, &ip), since, LIMITS)
        .await
        .unwrap()
    else {
        panic!("expected reservation");
    };
    store.release(&row).await.unwrap();
    assert_eq!(store.count_by_address_since(&ip, since).await.unwrap(), 0);

    let mut stale = submission(&email, &ip);
    stale.submitted_at = Utc::now() - Duration::hours(3);
    store.insert(stale).await.unwrap();

    let removed = store
        .delete_older_than(Utc::now() - Duration::hours(2))
        .await
        .unwrap();
    assert!(removed >= 1);
    assert_eq!(
        store
            .count_by_email_since(&email, Utc::now() - Duration::hours(4))
            .await
            .unwrap(),
        0
    );
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn visitor_tracking_is_idempotent(ctx: &TestHarness) {
    let store = PostgresVisitorStore::new(ctx.db_pool.clone());
    let hash = Uuid::new_v4().simple().to_string();

    let first = store.track(&hash).await.unwrap();
    let repeat = store.count().await.unwrap();
    store.track(&hash).await.unwrap();
    let after_repeat = store.count().await.unwrap();

    assert!(first >= 1);
    assert!(repeat >= first);
    // Other tests may add visitors concurrently, never this one twice
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_visitors WHERE visitor_hash = $1")
        .bind(&hash)
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert!(after_repeat >= repeat);
}
