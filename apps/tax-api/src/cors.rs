//! CORS handling for the storefront origin allow-list.
//!
//! Two pieces cooperate:
//! - [`cors_layer`] (tower-http) adds the `Access-Control-*` headers and
//!   answers preflight requests for listed origins.
//! - [`reject_unlisted_origin`] turns a request from any other origin into a
//!   403 before it reaches a handler. Requests without an `Origin` header
//!   (curl, server-to-server) pass through.

use axum::extract::{Request, State};
use axum::http::header::{CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// Create the CORS layer for the given origins.
///
/// Origins that are not valid header values are skipped; `ApiConfig` already
/// refuses to load them.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

/// Middleware: 403 for requests whose `Origin` is not allow-listed.
pub async fn reject_unlisted_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(origin) = request.headers().get(ORIGIN) {
        if !state.origin_allowed(origin) {
            warn!(origin = ?origin, "Rejected request from unlisted origin");
            return Err(ApiError::OriginRejected);
        }
    }

    Ok(next.run(request).await)
}
