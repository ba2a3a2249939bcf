//! # ziptax-core: Pure Tax Logic for ziptax
//!
//! This crate is the **heart** of ziptax. It contains the tax-resolution
//! algorithm as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ziptax Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront (browser)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ POST /calculate-tax (JSON)             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tax-api (axum)                               │   │
//! │  │         CORS gate, JSON extraction, error → HTTP status        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ziptax-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │   money   │  │jurisdiction│  │ resolver │  │   │
//! │  │   │  Order    │  │   Money   │  │   Index    │  │calculate │  │   │
//! │  │   │ Breakdown │  │  TaxRate  │  │  Record    │  │  _tax    │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                 ziptax-rates (CSV → Index)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Request/response types and rule enumerations
//! - [`money`] - Money type with exact decimal arithmetic
//! - [`jurisdiction`] - ZIP code → jurisdiction index
//! - [`states`] - State name normalization
//! - [`resolver`] - The `calculate-tax` operation
//! - [`validation`] - Line-item checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same order + same index = same breakdown
//! 2. **Injected Index**: the resolver never reaches for global data
//! 3. **Decimal Money**: no floating point anywhere in the tax path
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod jurisdiction;
pub mod money;
pub mod resolver;
pub mod states;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ErrorKind, TaxError, ValidationError};
pub use jurisdiction::{JurisdictionIndex, JurisdictionRates, JurisdictionRecord};
pub use money::Money;
pub use resolver::calculate_tax;
pub use types::*;
