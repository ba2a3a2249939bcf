//! # ziptax Tax API
//!
//! HTTP server computing sales tax for storefront orders.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tax API Startup                                │
//! │                                                                         │
//! │  env ──► ApiConfig ──► load rate table ──► bind ──► serve              │
//! │                             │                                           │
//! │                             └─ failure aborts startup; no requests     │
//! │                                are accepted before the index exists    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ziptax_api::{build_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting ziptax tax API...");

    let config = ApiConfig::load().context("Invalid configuration")?;
    info!(
        addr = %config.listen_address(),
        rates = %config.rates_path.display(),
        origins = ?config.allowed_origins,
        "Configuration loaded"
    );

    let index = ziptax_rates::load_from_path(&config.rates_path)
        .with_context(|| format!("Failed to load tax rates from {}", config.rates_path.display()))?;
    if index.is_empty() {
        warn!("Rate table is empty; every order will be rejected");
    }

    let app = build_router(AppState::new(index, config.allowed_origins.clone()));

    let addr = config.listen_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!(%addr, "Tax API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,ziptax=debug,tax_api=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ziptax=debug,tax_api=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
