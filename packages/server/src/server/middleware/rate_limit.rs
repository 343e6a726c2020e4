// Coarse per-IP request throttle using tower-governor
//
// Configuration:
// - /api/*: one request replenished every 500ms per IP (2/s) with a burst of 10
// - Sits in front of the OTP endpoints, which have no attempt counter of their own
// - Independent of the contact form's sliding window, which is enforced from the submission log
//
// Applied in app.rs as a layer on the /api router
use std::sync::Arc;

use axum::Router;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleSettings {
    /// Interval after which one request of the burst is replenished
    pub replenish_ms: u64,
    pub burst_size: u32,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            replenish_ms: 500,
            burst_size: 10,
        }
    }
}

/// Wrap `router` in a governor layer keyed on X-Forwarded-For / X-Real-IP / peer address.
pub fn with_throttle<S>(router: Router<S>, settings: ThrottleSettings) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_millisecond(settings.replenish_ms)
        .burst_size(settings.burst_size)
        .use_headers() // x-ratelimit-* response headers
        .finish();

    match config {
        Some(config) => router.layer(GovernorLayer {
            config: Arc::new(config),
        }),
        None => {
            warn!(?settings, "Invalid throttle settings, request throttle disabled");
            router
        }
    }
}
