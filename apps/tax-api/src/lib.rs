//! # ziptax Tax API
//!
//! HTTP front-end for the ziptax tax resolver.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tax API Request Path                           │
//! │                                                                         │
//! │  Browser ──► TraceLayer ──► Origin gate ──► CorsLayer ──► Router        │
//! │                                 │ 403                       │           │
//! │                                 ▼                           ▼           │
//! │                           { "error" }     POST /calculate-tax           │
//! │                                           GET  /health                  │
//! │                                           *    → 404 { "error" }        │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                          ziptax_core::calculate_tax(order, &index)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PORT` - HTTP port (default: 3000)
//! - `BIND_ADDRESS` - Interface to bind (default: 0.0.0.0)
//! - `TAX_RATES_PATH` - Rate table CSV (default: ./data/tax_rates.csv)
//! - `ALLOWED_ORIGINS` - Comma-separated CORS allow-list

pub mod config;
pub mod cors;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use ziptax_core::JurisdictionIndex;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;

/// Shared application state.
///
/// The index is immutable after startup, so handlers share it without locks.
#[derive(Debug, Clone)]
pub struct AppState {
    pub index: Arc<JurisdictionIndex>,
    pub allowed_origins: Arc<[String]>,
}

impl AppState {
    pub fn new(index: JurisdictionIndex, allowed_origins: Vec<String>) -> Self {
        AppState {
            index: Arc::new(index),
            allowed_origins: allowed_origins.into(),
        }
    }

    /// Whether `origin` is on the allow-list (exact match).
    pub fn origin_allowed(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins
            .iter()
            .any(|allowed| allowed.as_bytes() == origin.as_bytes())
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/calculate-tax",
            post(routes::tax::calculate).fallback(routes::route_not_found),
        )
        .route(
            "/health",
            get(routes::health::health).fallback(routes::route_not_found),
        )
        .fallback(routes::route_not_found)
        .layer(cors::cors_layer(&state.allowed_origins))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            cors::reject_unlisted_origin,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
