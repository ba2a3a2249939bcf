//! # Validation Module
//!
//! Line-item checks run after location validation and before any tax is
//! accrued.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Field types (numbers, strings, booleans)                          │
//! │  └── quantity is unsigned, so negatives never get this far             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Resolver                                                      │
//! │  ├── ZIP codes known, states consistent                                │
//! │  └── THIS MODULE: price and custom rate not negative                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::error::{TaxError, ValidationError};
use crate::types::LineItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates that a decimal field is zero or greater.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use ziptax_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("price", Decimal::ZERO).is_ok());
/// assert!(validate_non_negative("price", Decimal::NEGATIVE_ONE).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates one line item.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_non_negative("price", item.price)?;
    validate_non_negative("customTaxRate", item.custom_tax_rate)?;
    Ok(())
}

/// Validates every line item, reporting the first failure with its index.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), TaxError> {
    items.iter().enumerate().try_for_each(|(index, item)| {
        validate_line_item(item).map_err(|source| TaxError::InvalidLineItem { index, source })
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
