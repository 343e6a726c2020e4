//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::kernel::ServerDeps;
use crate::server::middleware::{extract_client_info, with_throttle, ThrottleSettings};
use crate::server::routes::{
    contact_handler, health_handler, send_otp_handler, track_visitor_handler,
    verify_otp_handler, visitor_count_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    /// Only used by the health check; stores own their own handles
    pub db_pool: Option<PgPool>,
}

impl AxumAppState {
    pub fn new(deps: ServerDeps, db_pool: Option<PgPool>) -> Self {
        Self {
            deps: Arc::new(deps),
            db_pool,
        }
    }
}

/// Router-level knobs that differ between production and tests
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    /// None disables the per-IP request throttle
    pub throttle: Option<ThrottleSettings>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Build the Axum application router
pub fn build_app(state: AxumAppState, options: &AppOptions) -> Router {
    let api = Router::new()
        .route("/api/send-otp", post(send_otp_handler))
        .route("/api/verify-otp", post(verify_otp_handler))
        .route("/api/contact", post(contact_handler))
        .route(
            "/api/visitors",
            get(visitor_count_handler).post(track_visitor_handler),
        );

    let api = match options.throttle {
        Some(settings) => with_throttle(api, settings),
        None => api,
    };

    Router::new()
        .merge(api)
        // Health check (no throttle)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(extract_client_info))
        .layer(Extension(state))
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Periodically evict expired OTP entries so abandoned codes do not accumulate
pub fn spawn_otp_sweeper(deps: Arc<ServerDeps>, every: Duration) -> JoinHandle<()> {
    let every = every.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match deps.otp_store.purge_expired(deps.clock.now()).await {
                Ok(0) => {}
                Ok(removed) => debug!(removed, "Purged expired OTP entries"),
                Err(e) => warn!(error = %e, "Failed to purge expired OTP entries"),
            }
        }
    })
}
