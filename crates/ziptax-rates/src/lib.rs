//! # ziptax-rates: Rate Table Loading for ziptax
//!
//! Reads the published jurisdiction rate table and builds the
//! [`JurisdictionIndex`](ziptax_core::JurisdictionIndex) the resolver runs
//! against.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ziptax Startup                                   │
//! │                                                                         │
//! │  data/tax_rates.csv                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  ziptax-rates (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   header → column positions → per-row record → last row wins   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<JurisdictionIndex> ──► tax-api handlers (read-only)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let index = ziptax_rates::load_from_path("./data/tax_rates.csv")?;
//! assert!(index.lookup("90210").is_some());
//! ```

pub mod error;
pub mod loader;

pub use error::{RatesError, RatesResult};
pub use loader::{load_from_path, load_from_reader};
