//! Submit contact action

use tracing::{debug, error, info, warn};

use crate::common::ClientInfo;
use crate::domains::contact::email::build_notification;
use crate::domains::contact::errors::{ContactError, RateLimitScope};
use crate::domains::contact::models::{ContactSubmission, NewContactSubmission};
use crate::domains::contact::validation::ContactForm;
use crate::domains::contact::{
    rate_limit_window, MAX_SUBMISSIONS_PER_ADDRESS, MAX_SUBMISSIONS_PER_EMAIL,
};
use crate::kernel::{with_timeout, Reservation, ServerDeps, SubmissionLimits};

/// Validate, rate limit, relay and log one contact form submission.
///
/// The submission row is reserved atomically against both rate limit windows
/// before the email goes out, so two simultaneous requests cannot both slip
/// under the same count. If delivery fails the reservation is released and the
/// attempt does not count against the sender.
pub async fn submit_contact(
    form: &ContactForm,
    client: &ClientInfo,
    deps: &ServerDeps,
) -> Result<ContactSubmission, ContactError> {
    if form.is_honeypot_filled() {
        info!(ip = %client.ip_address, "Honeypot field filled, dropping submission");
        return Err(ContactError::InvalidSubmission);
    }

    let contact = form.validate()?;
    let rate_limit_email = contact.rate_limit_email();

    info!(email = %contact.email, ip = %client.ip_address, "Received contact form submission");

    let now = deps.clock.now();
    let window_start = now - rate_limit_window();
    let limits = SubmissionLimits {
        per_email: MAX_SUBMISSIONS_PER_EMAIL,
        per_address: MAX_SUBMISSIONS_PER_ADDRESS,
    };

    let reservation = with_timeout(
        deps.upstream_timeout,
        "submission reserve",
        deps.submissions.reserve(
            NewContactSubmission {
                email: rate_limit_email,
                ip_address: client.ip_address.clone(),
                user_agent: client.user_agent.clone(),
                submitted_at: now,
            },
            window_start,
            limits,
        ),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Error checking rate limit");
        ContactError::ServiceUnavailable(e)
    })?;

    let submission = match reservation {
        Reservation::Reserved(submission) => submission,
        Reservation::EmailLimited => {
            info!(email = %contact.email, "Rate limit exceeded for email");
            return Err(ContactError::RateLimited(RateLimitScope::Email));
        }
        Reservation::AddressLimited => {
            info!(ip = %client.ip_address, "Rate limit exceeded for source address");
            return Err(ContactError::RateLimited(RateLimitScope::Address));
        }
    };

    let notification = build_notification(&contact, &deps.contact_to_email);
    let sent = with_timeout(
        deps.upstream_timeout,
        "email delivery",
        deps.email.send_email(&notification),
    )
    .await;

    if let Err(e) = sent {
        error!(error = %e, "Error sending contact email");

        // Spawned so the release still completes if the request is dropped
        let submissions = deps.submissions.clone();
        let timeout = deps.upstream_timeout;
        let reserved = submission.clone();
        let release = tokio::spawn(async move {
            with_timeout(timeout, "submission release", submissions.release(&reserved)).await
        });
        match release.await {
            Ok(Ok(())) => {}
            Ok(Err(release_err)) => {
                error!(error = %release_err, submission_id = %submission.id, "Failed to release submission after delivery failure");
            }
            Err(join_err) => {
                error!(error = %join_err, submission_id = %submission.id, "Submission release task failed");
            }
        }
        return Err(ContactError::ServiceUnavailable(e));
    }

    info!(submission_id = %submission.id, "Contact email sent");

    // Fire and forget: pruning must never fail the request.
    let submissions = deps.submissions.clone();
    let timeout = deps.upstream_timeout;
    tokio::spawn(async move {
        let pruned = with_timeout(
            timeout,
            "submission prune",
            submissions.delete_older_than(window_start),
        )
        .await;
        match pruned {
            Ok(removed) => debug!(removed, "Cleaned up old contact submissions"),
            Err(e) => warn!(error = %e, "Failed to clean up old contact submissions"),
        }
    });

    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TestDependencies;
    use std::time::Duration;

    fn form() -> ContactForm {
        ContactForm {
            name: Some("Ann Lee".to_string()),
            email: Some("ann@example.com".to_string()),
            message: Some("Hello, let's talk.".to_string()),
            website: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_completes_after_caller_gives_up() {
        let test_deps = TestDependencies::new();
        test_deps.email.set_delay(Duration::from_secs(60));
        test_deps.submissions.set_release_delay(Duration::from_secs(2));
        let deps = test_deps.server_deps();

        // Delivery times out at 5s; the caller is dropped at 6s, mid-release
        let outcome = tokio::time::timeout(
            Duration::from_secs(6),
            submit_contact(&form(), &ClientInfo::unknown(), &deps),
        )
        .await;
        assert!(outcome.is_err());
        assert_eq!(test_deps.submissions.all().await.len(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(test_deps.submissions.all().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_delivery_is_unavailable_and_uncounted() {
        let test_deps = TestDependencies::new();
        test_deps.email.set_delay(Duration::from_secs(60));
        let deps = test_deps.server_deps();

        let err = submit_contact(&form(), &ClientInfo::unknown(), &deps)
            .await
            .unwrap_err();

        assert!(matches!(err, ContactError::ServiceUnavailable(_)));
        assert!(test_deps.submissions.all().await.is_empty());
    }
}
