//! Verify OTP action

use tracing::{error, info};

use crate::common::hash_identifier;
use crate::domains::otp::errors::OtpError;
use crate::kernel::{with_timeout, ServerDeps};

/// Check `code` against the pending entry for `phone`.
///
/// - no entry: `NotFound`
/// - past expiry: `Expired`, entry removed
/// - wrong code: `Mismatch`, entry kept so the user can retry
/// - match: entry removed, `Ok(())`
///
/// Codes are compared with plain string equality and attempts are not
/// counted; the only bound on guessing is the five minute lifetime.
pub async fn verify_otp(phone: &str, code: &str, deps: &ServerDeps) -> Result<(), OtpError> {
    if phone.trim().is_empty() || code.is_empty() {
        return Err(OtpError::Validation(
            "Phone and code are required".to_string(),
        ));
    }

    let store_error = |e: anyhow::Error| {
        error!(error = %e, "OTP store failure during verification");
        OtpError::Unavailable(e)
    };

    let entry = with_timeout(deps.upstream_timeout, "otp store get", deps.otp_store.get(phone))
        .await
        .map_err(store_error)?
        .ok_or(OtpError::NotFound)?;

    if entry.is_expired(deps.clock.now()) {
        with_timeout(
            deps.upstream_timeout,
            "otp store delete",
            deps.otp_store.delete_matching(&entry),
        )
        .await
        .map_err(store_error)?;
        info!(phone_hash = %hash_identifier(phone), "OTP expired");
        return Err(OtpError::Expired);
    }

    if entry.code != code {
        return Err(OtpError::Mismatch);
    }

    // A concurrent verify may have consumed the entry between get and here.
    let consumed = with_timeout(
        deps.upstream_timeout,
        "otp store delete",
        deps.otp_store.delete_matching(&entry),
    )
    .await
    .map_err(store_error)?;

    if !consumed {
        return Err(OtpError::NotFound);
    }

    info!(phone_hash = %hash_identifier(phone), "OTP verified");
    Ok(())
}
