use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Twilio credentials; SMS delivery falls back to the console when absent
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
}

/// Resend credentials plus the owner inbox contact mail is relayed to
#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    pub to_email: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub twilio: Option<TwilioConfig>,
    pub resend: Option<ResendConfig>,
    pub contact_from_email: String,
    pub allowed_origins: Vec<String>,
    pub upstream_timeout: Duration,
    pub otp_sweep_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let twilio = match (
            non_empty_var("TWILIO_ACCOUNT_SID"),
            non_empty_var("TWILIO_AUTH_TOKEN"),
            non_empty_var("TWILIO_FROM"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from,
            }),
            _ => None,
        };

        let resend = match non_empty_var("RESEND_API_KEY") {
            Some(api_key) => Some(ResendConfig {
                api_key,
                to_email: non_empty_var("CONTACT_TO_EMAIL")
                    .context("CONTACT_TO_EMAIL must be set when RESEND_API_KEY is set")?,
            }),
            None => None,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            twilio,
            resend,
            contact_from_email: non_empty_var("CONTACT_FROM_EMAIL")
                .unwrap_or_else(|| "Portfolio Contact <onboarding@resend.dev>".to_string()),
            allowed_origins: parse_list(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            upstream_timeout: Duration::from_secs(
                env::var("UPSTREAM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("UPSTREAM_TIMEOUT_SECS must be a valid number")?,
            ),
            otp_sweep_interval: Duration::from_secs(
                env::var("OTP_SWEEP_INTERVAL_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .context("OTP_SWEEP_INTERVAL_SECS must be a valid number")?,
            ),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma-separated list, dropping blanks
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
