//! # Error Types
//!
//! Domain-specific error types for ziptax-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ziptax-core errors (this file)                                        │
//! │  ├── TaxError         - Resolution failures (what the caller sees)     │
//! │  └── ValidationError  - Line-item input failures                       │
//! │                                                                         │
//! │  ziptax-rates errors (separate crate)                                  │
//! │  └── RatesError       - Rate table loading failures (startup only)     │
//! │                                                                         │
//! │  tax-api errors (in app)                                               │
//! │  └── ApiError         - HTTP status + { "error": message }             │
//! │                                                                         │
//! │  Flow: ValidationError → TaxError → ApiError → storefront              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ZIP, state, line index)
//! 3. Every failure aborts resolution; there is no partial breakdown

use std::fmt;

use thiserror::Error;

// =============================================================================
// Order Side
// =============================================================================

/// Which party's location failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buyer,
    Seller,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buyer => write!(f, "Buyer"),
            Side::Seller => write!(f, "Seller"),
        }
    }
}

// =============================================================================
// Tax Error
// =============================================================================

/// Broad category of a [`TaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A ZIP code is not in the jurisdiction index.
    NotFound,
    /// A declared state does not match its ZIP code's jurisdiction.
    Mismatch,
    /// A line item is malformed.
    Validation,
}

/// Tax resolution errors.
///
/// ## Validation Order
/// ```text
/// both ZIPs known? ──no──► InvalidZip
///      │
///      ▼
/// buyer state ok? ──no──► StateMismatch { side: Buyer }
///      │
///      ▼
/// seller state ok? ──no──► StateMismatch { side: Seller }
///      │
///      ▼
/// line items ok? ──no──► InvalidLineItem
///      │
///      ▼
/// amounts fit? ──no──► AmountOverflow
/// ```
#[derive(Debug, Error)]
pub enum TaxError {
    /// Buyer or seller ZIP code is not in the index.
    #[error("Invalid ZIP code.")]
    InvalidZip,

    /// Declared state differs from the state stored for the ZIP code.
    #[error("{side} ZIP code {zip} does not match state {state}. Expected: {expected}.")]
    StateMismatch {
        side: Side,
        zip: String,
        /// Normalized state the caller declared.
        state: String,
        /// State stored for the ZIP code.
        expected: String,
    },

    /// A product in the order failed validation.
    #[error("Product {index}: {source}")]
    InvalidLineItem {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// An amount in the order does not fit in a decimal.
    #[error("Order amount is too large to calculate.")]
    AmountOverflow,
}

impl TaxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaxError::InvalidZip => ErrorKind::NotFound,
            TaxError::StateMismatch { .. } => ErrorKind::Mismatch,
            TaxError::InvalidLineItem { .. } | TaxError::AmountOverflow => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for a single field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with TaxError.
pub type TaxResult<T> = Result<T, TaxError>;

// =============================================================================
// Unit Tests
// =============================================================================
