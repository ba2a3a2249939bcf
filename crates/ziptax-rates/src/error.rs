//! # Rate Table Error Types
//!
//! Error types for loading the jurisdiction rate table.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / csv::Error                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RatesError (this module) ← Adds path and column context               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tax-api main ← Startup aborts; no rates means no service              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bad *values* never surface here: an unparseable rate cell becomes 0 and
//! a row without a ZIP code is skipped. Only structural problems fail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rate table loading errors.
#[derive(Debug, Error)]
pub enum RatesError {
    /// The rate table file could not be opened.
    ///
    /// ## When This Occurs
    /// - Wrong `TAX_RATES_PATH`
    /// - File permissions issue
    #[error("Failed to open rate table {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CSV stream itself is malformed or unreadable.
    ///
    /// ## When This Occurs
    /// - Invalid UTF-8
    /// - I/O failure mid-read
    #[error("Malformed rate table: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Rate table is missing required column '{0}'")]
    MissingColumn(&'static str),
}

impl RatesError {
    /// Creates an Open error for a given path.
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RatesError::Open {
            path: path.into(),
            source,
        }
    }
}

/// Result type for rate table operations.
pub type RatesResult<T> = Result<T, RatesError>;
