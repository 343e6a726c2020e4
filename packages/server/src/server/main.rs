// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use portfolio_core::kernel::ServerDeps;
use portfolio_core::server::{build_app, spawn_otp_sweeper, AppOptions, AxumAppState};
use portfolio_core::server::middleware::ThrottleSettings;
use portfolio_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,portfolio_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting portfolio API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database (optional)
    let pool = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .acquire_timeout(config.upstream_timeout)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations complete");
            Some(pool)
        }
        None => None,
    };

    // Build application
    let deps = ServerDeps::from_config(&config, pool.clone());
    let state = AxumAppState::new(deps, pool);
    let sweeper = spawn_otp_sweeper(Arc::clone(&state.deps), config.otp_sweep_interval);

    let app = build_app(
        state,
        &AppOptions {
            allowed_origins: config.allowed_origins.clone(),
            throttle: Some(ThrottleSettings::default()),
        },
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("OTP server listening on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
