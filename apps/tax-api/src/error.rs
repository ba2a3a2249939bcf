//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ziptax                                 │
//! │                                                                         │
//! │  TaxError::InvalidZip ────────┐                                        │
//! │  TaxError::StateMismatch ─────┼──► 400 { "error": "..." }              │
//! │  TaxError::InvalidLineItem ───┤                                        │
//! │  malformed JSON body ─────────┘                                        │
//! │                                                                         │
//! │  disallowed Origin ───────────────► 403 { "error": "..." }             │
//! │  unknown route ───────────────────► 404 { "error": "Route not found" } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The storefront only ever reads `error`; the status code tells it whether
//! the order itself was at fault.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use ziptax_core::TaxError;

/// Error body returned on every failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Order failed validation (bad ZIP, state mismatch, bad line item).
    #[error(transparent)]
    Tax(#[from] TaxError),

    /// Request body is not a valid order.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("CORS policy does not allow access from this origin")]
    OriginRejected,

    #[error("Route not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Tax(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::OriginRejected => StatusCode::FORBIDDEN,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
