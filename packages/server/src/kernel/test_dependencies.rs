// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{
    BaseClock, BaseCodeGenerator, BaseEmailService, BaseOtpStore, BaseSmsService,
    BaseSubmissionStore, InMemoryOtpStore, InMemorySubmissionStore, InMemoryVisitorStore,
    OutgoingEmail, Reservation, ServerDeps, SubmissionLimits,
};
use crate::domains::contact::models::{ContactSubmission, NewContactSubmission};
use crate::domains::otp::OtpEntry;

// =============================================================================
// Mock SMS Service
// =============================================================================

/// Arguments captured from a send_sms call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsCall {
    pub to: String,
    pub body: String,
}

#[derive(Default)]
pub struct MockSmsService {
    calls: Mutex<Vec<SmsCall>>,
    fail: AtomicBool,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Get all messages that were sent (including failed attempts)
    pub fn calls(&self) -> Vec<SmsCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<()> {
        self.calls.lock().unwrap().push(SmsCall {
            to: to.to_string(),
            body: body.to_string(),
        });

        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("mock SMS provider error: 21211 invalid 'To' number"));
        }
        Ok(())
    }
}

// =============================================================================
// Mock Email Service
// =============================================================================

#[derive(Default)]
pub struct MockEmailService {
    sent: Mutex<Vec<OutgoingEmail>>,
    attempts: Mutex<usize>,
    fail: AtomicBool,
    delay: Mutex<Option<std::time::Duration>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Hold every send for `delay` before answering
    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Emails that were accepted
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Every send attempt, including failures
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl BaseEmailService for MockEmailService {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("mock email provider error: upstream 500 at api.internal"));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// =============================================================================
// Mock OTP Store
// =============================================================================

/// In-memory OTP store that can be switched into a failing state
#[derive(Default)]
pub struct MockOtpStore {
    inner: InMemoryOtpStore,
    fail: AtomicBool,
}

impl MockOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every store operation fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("mock OTP store error: connection reset by 10.0.0.12:6379"));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseOtpStore for MockOtpStore {
    async fn get(&self, phone: &str) -> Result<Option<OtpEntry>> {
        self.check()?;
        self.inner.get(phone).await
    }

    async fn set(&self, entry: OtpEntry) -> Result<()> {
        self.check()?;
        self.inner.set(entry).await
    }

    async fn delete(&self, phone: &str) -> Result<()> {
        self.check()?;
        self.inner.delete(phone).await
    }

    async fn delete_matching(&self, entry: &OtpEntry) -> Result<bool> {
        self.check()?;
        self.inner.delete_matching(entry).await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        self.check()?;
        self.inner.purge_expired(now).await
    }
}

// =============================================================================
// Mock Submission Store
// =============================================================================

/// In-memory submission log with failure and latency toggles
#[derive(Default)]
pub struct MockSubmissionStore {
    inner: InMemorySubmissionStore,
    fail_reserve: AtomicBool,
    fail_prune: AtomicBool,
    release_delay: Mutex<Option<std::time::Duration>>,
    prune_attempts: AtomicUsize,
}

impl MockSubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reserve_failing(&self, fail: bool) {
        self.fail_reserve.store(fail, Ordering::SeqCst);
    }

    pub fn set_prune_failing(&self, fail: bool) {
        self.fail_prune.store(fail, Ordering::SeqCst);
    }

    /// Hold every release for `delay` before it takes effect
    pub fn set_release_delay(&self, delay: std::time::Duration) {
        *self.release_delay.lock().unwrap() = Some(delay);
    }

    pub fn prune_attempts(&self) -> usize {
        self.prune_attempts.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored row
    pub async fn all(&self) -> Vec<ContactSubmission> {
        self.inner.all().await
    }
}

#[async_trait]
impl BaseSubmissionStore for MockSubmissionStore {
    async fn insert(&self, submission: NewContactSubmission) -> Result<ContactSubmission> {
        self.inner.insert(submission).await
    }

    async fn count_by_email_since(&self, email: &str, since: DateTime<Utc>) -> Result<i64> {
        self.inner.count_by_email_since(email, since).await
    }

    async fn count_by_address_since(&self, address: &str, since: DateTime<Utc>) -> Result<i64> {
        self.inner.count_by_address_since(address, since).await
    }

    async fn reserve(
        &self,
        submission: NewContactSubmission,
        since: DateTime<Utc>,
        limits: SubmissionLimits,
    ) -> Result<Reservation> {
        if self.fail_reserve.load(Ordering::SeqCst) {
            return Err(anyhow!("mock database error: relation \"contact_submissions\" is locked"));
        }
        self.inner.reserve(submission, since, limits).await
    }

    async fn release(&self, submission: &ContactSubmission) -> Result<()> {
        let delay = *self.release_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.release(submission).await
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        self.prune_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_prune.load(Ordering::SeqCst) {
            return Err(anyhow!("mock database error: prune failed"));
        }
        self.inner.delete_older_than(cutoff).await
    }
}

// =============================================================================
// Mock Clock
// =============================================================================

pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        )
    }
}

impl BaseClock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// =============================================================================
// Fixed Code Generator
// =============================================================================

/// Hands out queued codes in order, then repeats the last one
pub struct FixedCodeGenerator {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl FixedCodeGenerator {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: Mutex::new(codes.into_iter().map(Into::into).collect()),
            last: Mutex::new("123456".to_string()),
        }
    }

    pub fn push(&self, code: impl Into<String>) {
        self.codes.lock().unwrap().push_back(code.into());
    }
}

impl BaseCodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        let mut last = self.last.lock().unwrap();
        if let Some(code) = self.codes.lock().unwrap().pop_front() {
            *last = code;
        }
        last.clone()
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock-backed dependencies with handles kept for assertions
#[derive(Clone)]
pub struct TestDependencies {
    pub sms: Arc<MockSmsService>,
    pub email: Arc<MockEmailService>,
    pub otp_store: Arc<MockOtpStore>,
    pub submissions: Arc<MockSubmissionStore>,
    pub visitors: Arc<InMemoryVisitorStore>,
    pub clock: Arc<MockClock>,
    pub codes: Arc<FixedCodeGenerator>,
    pub contact_to_email: String,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            sms: Arc::new(MockSmsService::new()),
            email: Arc::new(MockEmailService::new()),
            otp_store: Arc::new(MockOtpStore::new()),
            submissions: Arc::new(MockSubmissionStore::new()),
            visitors: Arc::new(InMemoryVisitorStore::new()),
            clock: Arc::new(MockClock::default()),
            codes: Arc::new(FixedCodeGenerator::new(Vec::<String>::new())),
            contact_to_email: "owner@example.com".to_string(),
        }
    }

    /// Queue the codes the next OTP issuances will receive
    pub fn with_codes<I, S>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for code in codes {
            self.codes.push(code);
        }
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.sms.clone(),
            self.email.clone(),
            self.otp_store.clone(),
            self.submissions.clone(),
            self.visitors.clone(),
            self.clock.clone(),
            self.codes.clone(),
            self.contact_to_email.clone(),
            std::time::Duration::from_secs(5),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
