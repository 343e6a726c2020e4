// ServerDeps - central dependency container
//
// Holds every infrastructure capability the domain actions reach for, as trait
// objects so tests can swap in mocks (see test_dependencies.rs).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use resend::{EmailRequest, ResendOptions, ResendService};
use sqlx::PgPool;
use tracing::{info, warn};
use twilio::{TwilioOptions, TwilioService};

use crate::config::Config;
use crate::domains::otp::RandomCodeGenerator;
use crate::kernel::{
    BaseClock, BaseCodeGenerator, BaseEmailService, BaseOtpStore, BaseSmsService,
    BaseSubmissionStore, BaseVisitorStore, InMemoryOtpStore, InMemorySubmissionStore,
    InMemoryVisitorStore, OutgoingEmail, PostgresSubmissionStore, PostgresVisitorStore,
    SystemClock,
};

// =============================================================================
// TwilioService Adapter (implements BaseSmsService trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseSmsService trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsService for TwilioAdapter {
    async fn send_sms(&self, to: &str, body: &str) -> Result<()> {
        self.0
            .send_sms(to, body)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

/// Development fallback when Twilio is not configured: the message goes to the log
pub struct ConsoleSmsService;

#[async_trait]
impl BaseSmsService for ConsoleSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<()> {
        info!("Simulated SMS to {}: {}", to, body);
        Ok(())
    }
}

// =============================================================================
// ResendService Adapter (implements BaseEmailService trait)
// =============================================================================

/// Wrapper around ResendService that implements BaseEmailService trait
pub struct ResendAdapter {
    service: Arc<ResendService>,
    from: String,
}

impl ResendAdapter {
    pub fn new(service: Arc<ResendService>, from: String) -> Self {
        Self { service, from }
    }
}

#[async_trait]
impl BaseEmailService for ResendAdapter {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<()> {
        let request = EmailRequest {
            from: self.from.clone(),
            to: vec![email.to.clone()],
            subject: email.subject.clone(),
            html: email.html.clone(),
            reply_to: Some(email.reply_to.clone()),
        };

        let response = self
            .service
            .send_email(&request)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        info!(email_id = %response.id, "Email accepted by Resend");
        Ok(())
    }
}

/// Development fallback when Resend is not configured
pub struct ConsoleEmailService;

#[async_trait]
impl BaseEmailService for ConsoleEmailService {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<()> {
        info!(
            to = %email.to,
            reply_to = %email.reply_to,
            subject = %email.subject,
            "Simulated email delivery"
        );
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub sms: Arc<dyn BaseSmsService>,
    pub email: Arc<dyn BaseEmailService>,
    pub otp_store: Arc<dyn BaseOtpStore>,
    pub submissions: Arc<dyn BaseSubmissionStore>,
    pub visitors: Arc<dyn BaseVisitorStore>,
    pub clock: Arc<dyn BaseClock>,
    pub code_generator: Arc<dyn BaseCodeGenerator>,
    /// Site owner inbox that contact submissions are relayed to
    pub contact_to_email: String,
    /// Upper bound for every delivery and persistence call
    pub upstream_timeout: Duration,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sms: Arc<dyn BaseSmsService>,
        email: Arc<dyn BaseEmailService>,
        otp_store: Arc<dyn BaseOtpStore>,
        submissions: Arc<dyn BaseSubmissionStore>,
        visitors: Arc<dyn BaseVisitorStore>,
        clock: Arc<dyn BaseClock>,
        code_generator: Arc<dyn BaseCodeGenerator>,
        contact_to_email: String,
        upstream_timeout: Duration,
    ) -> Self {
        Self {
            sms,
            email,
            otp_store,
            submissions,
            visitors,
            clock,
            code_generator,
            contact_to_email,
            upstream_timeout,
        }
    }

    /// Wire production dependencies from configuration.
    ///
    /// Missing provider credentials fall back to console delivery and a missing
    /// database falls back to in-memory stores. Both are logged loudly.
    pub fn from_config(config: &Config, pool: Option<PgPool>) -> Self {
        let sms: Arc<dyn BaseSmsService> = match &config.twilio {
            Some(twilio) => {
                info!("Twilio enabled for SMS sending");
                let service = TwilioService::with_timeout(
                    TwilioOptions {
                        account_sid: twilio.account_sid.clone(),
                        auth_token: twilio.auth_token.clone(),
                        from: twilio.from.clone(),
                    },
                    config.upstream_timeout,
                );
                Arc::new(TwilioAdapter::new(Arc::new(service)))
            }
            None => {
                warn!("Twilio not configured. OTPs will be logged in server console (development only)");
                Arc::new(ConsoleSmsService)
            }
        };

        let (email, contact_to_email): (Arc<dyn BaseEmailService>, String) = match &config.resend
        {
            Some(resend) => {
                info!("Resend enabled for contact email relay");
                let service = ResendService::with_timeout(
                    ResendOptions {
                        api_key: resend.api_key.clone(),
                    },
                    config.upstream_timeout,
                );
                (
                    Arc::new(ResendAdapter::new(
                        Arc::new(service),
                        config.contact_from_email.clone(),
                    )),
                    resend.to_email.clone(),
                )
            }
            None => {
                warn!("Resend not configured. Contact emails will be logged in server console (development only)");
                (Arc::new(ConsoleEmailService), "owner@localhost".to_string())
            }
        };

        let (submissions, visitors): (Arc<dyn BaseSubmissionStore>, Arc<dyn BaseVisitorStore>) =
            match pool {
                Some(pool) => (
                    Arc::new(PostgresSubmissionStore::new(pool.clone())),
                    Arc::new(PostgresVisitorStore::new(pool)),
                ),
                None => {
                    warn!("DATABASE_URL not set. Submissions and visitors are kept in memory (development only)");
                    (
                        Arc::new(InMemorySubmissionStore::new()),
                        Arc::new(InMemoryVisitorStore::new()),
                    )
                }
            };

        Self::new(
            sms,
            email,
            Arc::new(InMemoryOtpStore::new()),
            submissions,
            visitors,
            Arc::new(SystemClock),
            Arc::new(RandomCodeGenerator),
            contact_to_email,
            config.upstream_timeout,
        )
    }
}
