//! Send OTP action

use tracing::{error, info};

use crate::common::hash_identifier;
use crate::domains::otp::errors::OtpError;
use crate::domains::otp::models::OtpEntry;
use crate::kernel::{with_timeout, ServerDeps};

/// Issue a fresh code for `phone` and hand it to the SMS capability.
///
/// The entry is stored before delivery is attempted. If delivery fails the
/// caller gets `OtpError::Delivery` but the stored code stays valid until it
/// expires or is replaced. Persisting only after a confirmed send would change
/// what a user sees on a flaky provider, so the ordering is kept as is.
pub async fn send_otp(phone: &str, deps: &ServerDeps) -> Result<OtpEntry, OtpError> {
    if phone.trim().is_empty() {
        return Err(OtpError::Validation("Phone number is required".to_string()));
    }

    let code = deps.code_generator.generate();
    let entry = OtpEntry::new(phone, code, deps.clock.now());

    with_timeout(
        deps.upstream_timeout,
        "otp store set",
        deps.otp_store.set(entry.clone()),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to store OTP");
        OtpError::Unavailable(e)
    })?;

    let body = format!("Your verification code is {}", entry.code);
    with_timeout(
        deps.upstream_timeout,
        "sms delivery",
        deps.sms.send_sms(phone, &body),
    )
    .await
    .map_err(|e| {
        error!(phone_hash = %hash_identifier(phone), error = %e, "Error sending OTP");
        OtpError::Delivery(e)
    })?;

    info!(phone_hash = %hash_identifier(phone), "OTP sent");
    Ok(entry)
}
