//! HTTP route handlers.

pub mod health;
pub mod tax;

use crate::error::ApiError;

/// Fallback for unknown paths and unsupported methods.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
