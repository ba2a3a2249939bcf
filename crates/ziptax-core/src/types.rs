//! # Domain Types
//!
//! Request and response types for the `calculate-tax` operation.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  OrderRequest   │   │    LineItem     │   │  TaxBreakdown   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  products[]     │──►│  price          │   │  taxRegion      │       │
//! │  │  seller zip/st  │   │  quantity       │   │  totalPrice     │       │
//! │  │  buyer zip/st   │   │  useCustomTax   │   │  totalTax       │       │
//! │  │  taxRuleType    │   │  customTaxRate  │   │  finalTotal     │       │
//! │  │  isTaxExempt    │   └─────────────────┘   │  breakdown{4}   │       │
//! │  │  overrideGroup  │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  TaxRuleType    │   │ OverrideGroup   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  percentage     │   │  OriginBased    │   │  HalfRate       │       │
//! │  │  7.25 = 7.25%   │   │  Destination…   │   │  Unrecognized   │       │
//! │  └─────────────────┘   │  Other(raw)     │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names are camelCase on the wire. Monetary results serialize as
//! two-decimal strings; inputs accept JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Wire value selecting seller-side sourcing.
pub const ORIGIN_BASED: &str = "Origin-Based";

/// Wire value selecting buyer-side sourcing.
pub const DESTINATION_BASED: &str = "Destination-Based";

/// Wire value of the override group that halves state and city rates.
pub const HALF_RATE_GROUP: &str = "50% Reduction";

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented as a percentage.
///
/// ## Why Percentages?
/// The rate table stores decimal fractions (`0.0725`); everything downstream
/// works in percent (`7.25`). Conversion happens once, at construction.
/// Rates like `0.125%` are common for special districts, so the value is
/// an exact decimal rather than basis points.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a tax rate from a percentage (`7.25` = 7.25%).
    #[inline]
    pub const fn from_percentage(pct: Decimal) -> Self {
        TaxRate(pct)
    }

    /// Creates a tax rate from a decimal fraction (`0.0725` = 7.25%).
    ///
    /// `None` if the percentage does not fit in a `Decimal`.
    #[inline]
    pub fn from_fraction(fraction: Decimal) -> Option<Self> {
        fraction.checked_mul(Decimal::ONE_HUNDRED).map(TaxRate)
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percentage(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Half of this rate.
    #[inline]
    pub fn halved(&self) -> Self {
        TaxRate(self.0 / Decimal::TWO)
    }

    /// This rate, or zero if it is negative.
    #[inline]
    pub fn non_negative(self) -> Self {
        if self.0.is_sign_negative() {
            TaxRate::zero()
        } else {
            self
        }
    }
}

// =============================================================================
// Sourcing Rule
// =============================================================================

/// Which side of the sale supplies the jurisdiction rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sourcing {
    /// Seller's jurisdiction.
    Origin,
    /// Buyer's jurisdiction.
    #[default]
    Destination,
}

/// The caller's `taxRuleType`.
///
/// Unknown strings are kept in `Other` so the response can echo exactly what
/// was sent. They source like `DestinationBased`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaxRuleType {
    /// `"Origin-Based"`
    OriginBased,
    /// `"Destination-Based"`
    DestinationBased,
    /// Any other value, verbatim.
    Other(String),
}

impl TaxRuleType {
    /// Sourcing selected by this rule type.
    ///
    /// Only `OriginBased` uses the seller. Everything else, including values
    /// this service does not recognise, falls back to the buyer.
    pub fn sourcing(&self) -> Sourcing {
        match self {
            TaxRuleType::OriginBased => Sourcing::Origin,
            TaxRuleType::DestinationBased | TaxRuleType::Other(_) => Sourcing::Destination,
        }
    }

    /// The wire string for this rule type.
    pub fn as_str(&self) -> &str {
        match self {
            TaxRuleType::OriginBased => ORIGIN_BASED,
            TaxRuleType::DestinationBased => DESTINATION_BASED,
            TaxRuleType::Other(raw) => raw,
        }
    }
}

impl From<String> for TaxRuleType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            ORIGIN_BASED => TaxRuleType::OriginBased,
            DESTINATION_BASED => TaxRuleType::DestinationBased,
            _ => TaxRuleType::Other(raw),
        }
    }
}

impl From<TaxRuleType> for String {
    fn from(rule: TaxRuleType) -> Self {
        match rule {
            TaxRuleType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

// =============================================================================
// Override Group
// =============================================================================

/// The caller's `taxOverrideGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverrideGroup {
    /// `"50% Reduction"`: state and city rates are halved.
    HalfRate,
    /// Any other group name. Has no effect on rates.
    Unrecognized(String),
}

impl OverrideGroup {
    /// Applies the group's adjustment to a state or city rate.
    ///
    /// County and special-district rates are never passed through here.
    pub fn adjust(&self, rate: TaxRate) -> TaxRate {
        match self {
            OverrideGroup::HalfRate => rate.halved(),
            OverrideGroup::Unrecognized(_) => rate,
        }
    }
}

impl From<String> for OverrideGroup {
    fn from(raw: String) -> Self {
        if raw == HALF_RATE_GROUP {
            OverrideGroup::HalfRate
        } else {
            OverrideGroup::Unrecognized(raw)
        }
    }
}

impl From<OverrideGroup> for String {
    fn from(group: OverrideGroup) -> Self {
        match group {
            OverrideGroup::HalfRate => HALF_RATE_GROUP.to_string(),
            OverrideGroup::Unrecognized(raw) => raw,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unit price in dollars.
    #[ts(type = "number")]
    pub price: Decimal,

    /// Units ordered.
    pub quantity: u32,

    /// Scale the subtotal by `customTaxRate` before any tax is applied.
    #[serde(default)]
    pub use_custom_tax: bool,

    /// Percentage applied when `useCustomTax` is set (`50` halves the subtotal).
    #[serde(default)]
    #[ts(type = "number")]
    pub custom_tax_rate: Decimal,
}

impl LineItem {
    /// Price × quantity, before any override. `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        Money::from_decimal(self.price).checked_multiply_quantity(u64::from(self.quantity))
    }

    /// The custom rate as a [`TaxRate`].
    pub fn custom_rate(&self) -> TaxRate {
        TaxRate::from_percentage(self.custom_tax_rate)
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// Input to the `calculate-tax` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Products in the order, processed in this order.
    pub products: Vec<LineItem>,

    #[serde(default, deserialize_with = "zip_code")]
    pub seller_zip: String,

    /// Two-letter code or full state name.
    #[serde(default)]
    pub seller_state: String,

    #[serde(default, deserialize_with = "zip_code")]
    pub buyer_zip: String,

    /// Two-letter code or full state name.
    #[serde(default)]
    pub buyer_state: String,

    /// Opaque to this service; echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub delivery_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub tax_rule_type: Option<TaxRuleType>,

    #[serde(default)]
    pub is_tax_exempt: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub tax_override_group: Option<OverrideGroup>,
}

impl OrderRequest {
    /// Sourcing for this order; buyer-side unless the rule says otherwise.
    pub fn sourcing(&self) -> Sourcing {
        self.tax_rule_type
            .as_ref()
            .map(TaxRuleType::sourcing)
            .unwrap_or_default()
    }
}

/// Accepts ZIP codes sent either as strings or as bare JSON integers.
fn zip_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Zip {
        Text(String),
        Number(u64),
    }

    Ok(match Zip::deserialize(deserializer)? {
        Zip::Text(zip) => zip,
        Zip::Number(zip) => zip.to_string(),
    })
}

// =============================================================================
// Tax Breakdown
// =============================================================================

/// Per-component tax totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComponentBreakdown {
    #[ts(as = "String")]
    pub state_tax: Money,
    #[ts(as = "String")]
    pub county_tax: Money,
    #[ts(as = "String")]
    pub city_tax: Money,
    #[ts(as = "String")]
    pub special_tax: Money,
}

impl ComponentBreakdown {
    /// Sum of the four components, or `None` on overflow.
    pub fn checked_total(&self) -> Option<Money> {
        [self.county_tax, self.city_tax, self.special_tax]
            .into_iter()
            .try_fold(self.state_tax, |sum, component| sum.checked_add(component))
    }
}

/// Result of the `calculate-tax` operation.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub delivery_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub tax_rule_type: Option<TaxRuleType>,

    /// Region name of the jurisdiction whose rates were applied.
    pub tax_region: String,

    #[ts(as = "String")]
    pub total_price: Money,

    #[ts(as = "String")]
    pub total_tax: Money,

    #[ts(as = "String")]
    pub final_total: Money,

    pub breakdown: ComponentBreakdown,
}

// =============================================================================
// Unit Tests
// =============================================================================
