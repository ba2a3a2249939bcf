//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    10.005 × 0.07 may round either way at the cent boundary             │
//! │                                                                         │
//! │  WHY NOT INTEGER CENTS?                                                 │
//! │    A custom tax rate scales the subtotal itself:                        │
//! │    $20.01 × 50% = $10.005  → sub-cent precision is real here           │
//! │                                                                         │
//! │  OUR SOLUTION: exact base-10 decimals                                   │
//! │    Subtotals keep full precision, every tax component is rounded       │
//! │    to cents exactly once, half-up.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use ziptax_core::money::Money;
//! use ziptax_core::types::TaxRate;
//!
//! let subtotal = Money::from_decimal(Decimal::new(10000, 2)); // $100.00
//! let tax = subtotal.checked_tax(TaxRate::from_percentage(Decimal::new(725, 2))).unwrap();
//! assert_eq!(tax.to_string(), "7.25");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::types::TaxRate;

/// Decimal places of the currency's minor unit (cents).
pub const CENT_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in major units (dollars), held as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal, not f64**: no binary representation error in sums
/// - **Unrounded by default**: only tax components and final output are
///   rounded; intermediate subtotals keep their full precision
/// - **Serializes as a string**: always two decimals (`"107.25"`), the
///   format the storefront displays directly
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  LineItem.price × quantity ──► subtotal ──► (custom rate scaling)       │
/// │                                   │                                     │
/// │                                   ├──► checked_tax(rate) ×4 ──► cents   │
/// │                                   │                                     │
/// │                                   └──► total price                      │
/// │                                                                         │
/// │  total price + Σ components ──► final total ──► "107.25"                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from a decimal amount in dollars.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use ziptax_core::money::Money;
    ///
    /// let unit_price = Money::from_decimal(Decimal::new(299, 2)); // $2.99
    /// assert_eq!(unit_price.checked_multiply_quantity(3).unwrap().to_string(), "8.97");
    /// assert!(Money::from_decimal(Decimal::MAX).checked_multiply_quantity(2).is_none());
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: u64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Scales the amount by a percentage without rounding.
    ///
    /// `checked_scale_by(50%)` on $200.00 gives $100.00. Used for the
    /// per-product custom tax rate, which replaces the subtotal rather than
    /// adding tax. `None` on overflow.
    pub fn checked_scale_by(&self, rate: TaxRate) -> Option<Money> {
        self.0
            .checked_mul(rate.percentage())?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(Money)
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Rounds to whole cents, half-up (midpoint away from zero).
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use ziptax_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(825, 3)).round_to_cents().amount(), Decimal::new(83, 2));
    /// assert_eq!(Money::from_decimal(Decimal::new(70035, 5)).round_to_cents().amount(), Decimal::new(70, 2));
    /// ```
    pub fn round_to_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Calculates a single tax component rounded to cents.
    ///
    /// ## Rounding
    /// `amount × rate / 100`, then half-up at the cent boundary. Each call
    /// rounds independently; callers sum already-rounded components.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use ziptax_core::money::Money;
    /// use ziptax_core::types::TaxRate;
    ///
    /// let price = Money::from_decimal(Decimal::new(1000, 2)); // $10.00
    /// let rate = TaxRate::from_percentage(Decimal::new(825, 2)); // 8.25%
    ///
    /// // $10.00 × 8.25% = $0.825 → $0.83
    /// assert_eq!(price.checked_tax(rate).unwrap().to_string(), "0.83");
    /// ```
    pub fn checked_tax(&self, rate: TaxRate) -> Option<Money> {
        self.checked_scale_by(rate).map(|scaled| scaled.round_to_cents())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display always renders exactly two decimals, rounding half-up first.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_to_cents().0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
