//! Payments API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin payments-api
//!
//! # Run with environment variables
//! API_PORT=8080 DATABASE_URL=postgres://... API_LOG_FORMAT=json cargo run --bin payments-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST`, `API_PORT` - Bind address (default: 0.0.0.0:8080)
//! * `DATABASE_URL` or `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `API_LOG_LEVEL` - Fallback filter when `RUST_LOG` is unset (default: info)
//! * `API_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API_MAX_ATTEMPTS` - Attempts per payment (default: 3)
//! * `API_RETRY_BASE_DELAY_MS` - Backoff unit (default: 100)
//! * `API_ATTEMPT_TIMEOUT_MS` - Per-attempt timeout, 0 disables (default: 0)
//! * `API_GATEWAY_FAILURE_RATE` - Simulated gateway failure probability (default: 0.3)
//! * `API_GATEWAY_LATENCY_MS` - Simulated gateway delay (default: 50)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_payment::{PaymentService, RandomFailure, SimulatedGateway};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresPaymentAdapter};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        max_attempts = config.max_attempts,
        gateway_failure_rate = config.gateway_failure_rate,
        "Starting Payments API Server"
    );

    let db_config = DatabaseConfig::new(config.database_url.clone())
        .max_connections(config.database_max_connections);
    let pool = create_pool(db_config).await.context("failed to connect to database")?;
    run_migrations(&pool).await.context("failed to run migrations")?;

    let store = Arc::new(PostgresPaymentAdapter::new(pool));
    let gateway = Arc::new(SimulatedGateway::new(
        Arc::new(RandomFailure::new(config.gateway_failure_rate)),
        config.gateway_latency(),
    ));
    let service = PaymentService::new(store, gateway, config.retry_policy());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server_addr()))?;

    let app = create_router(AppState::new(service, config));

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await.context("failed to bind")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured log level.
fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM)
///
/// In-flight requests, and the submissions they spawned, complete before
/// the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
