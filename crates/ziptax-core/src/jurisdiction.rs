//! # Jurisdiction Index
//!
//! ZIP code → jurisdiction tax data.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  rate table rows ──► JurisdictionIndex::build ──► Arc<Index> (shared)   │
//! │   (ziptax-rates)        last row wins               read-only           │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                       resolver: lookup(buyer/seller)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no mutation API: the index is built once and then only read,
//! so it can be shared across request handlers without locking.

use std::collections::HashMap;

use crate::types::TaxRate;

/// The five rate components published for a jurisdiction, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JurisdictionRates {
    /// Published combined rate. Informational; the resolver sums components.
    pub combined: TaxRate,
    pub state: TaxRate,
    pub county: TaxRate,
    pub city: TaxRate,
    pub special: TaxRate,
}

impl JurisdictionRates {
    /// Same rates with every negative component replaced by zero.
    pub fn non_negative(self) -> Self {
        JurisdictionRates {
            combined: self.combined.non_negative(),
            state: self.state.non_negative(),
            county: self.county.non_negative(),
            city: self.city.non_negative(),
            special: self.special.non_negative(),
        }
    }
}

/// Tax data for one ZIP code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JurisdictionRecord {
    state_code: String,
    region_name: String,
    rates: JurisdictionRates,
}

impl JurisdictionRecord {
    /// Creates a record. Negative rates are clamped to zero.
    pub fn new(
        state_code: impl Into<String>,
        region_name: impl Into<String>,
        rates: JurisdictionRates,
    ) -> Self {
        JurisdictionRecord {
            state_code: state_code.into(),
            region_name: region_name.into(),
            rates: rates.non_negative(),
        }
    }

    /// Two-letter state code as stored in the rate table.
    pub fn state_code(&self) -> &str {
        &self.state_code
    }

    /// Tax region name, e.g. `"LOS ANGELES COUNTY"`.
    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    pub fn rates(&self) -> &JurisdictionRates {
        &self.rates
    }
}

/// Immutable ZIP code → [`JurisdictionRecord`] map.
#[derive(Debug, Clone, Default)]
pub struct JurisdictionIndex {
    records: HashMap<String, JurisdictionRecord>,
}

impl JurisdictionIndex {
    /// Builds the index from `(zip, record)` pairs.
    ///
    /// ZIP codes are matched exactly as given. When a ZIP appears more than
    /// once, the last pair wins.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, JurisdictionRecord)>,
    {
        JurisdictionIndex {
            records: rows.into_iter().collect(),
        }
    }

    /// Looks up the record for a ZIP code.
    #[inline]
    pub fn lookup(&self, zip: &str) -> Option<&JurisdictionRecord> {
        self.records.get(zip)
    }

    /// Number of distinct ZIP codes.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(String, JurisdictionRecord)> for JurisdictionIndex {
    fn from_iter<I: IntoIterator<Item = (String, JurisdictionRecord)>>(iter: I) -> Self {
        JurisdictionIndex::build(iter)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(state: &str, region: &str, state_rate: rust_decimal::Decimal) -> JurisdictionRecord {
        JurisdictionRecord::new(
            state,
            region,
            JurisdictionRates {
                state: TaxRate::from_percentage(state_rate),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_lookup_exact_match() {
        let index = JurisdictionIndex::build([(
            "02134".to_string(),
            record("MA", "BOSTON", dec!(6.25)),
        )]);

        assert_eq!(index.lookup("02134").unwrap().state_code(), "MA");
        assert!(index.lookup("2134").is_none());
        assert!(index.lookup("02134 ").is_none());
    }

    #[test]
    fn test_last_row_wins() {
        let index: JurisdictionIndex = [
            ("73301".to_string(), record("TX", "FIRST", dec!(6.25))),
            ("73301".to_string(), record("TX", "SECOND", dec!(6.25))),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("73301").unwrap().region_name(), "SECOND");
    }

    #[test]
    fn test_negative_rates_clamped() {
        let rec = record("CA", "X", dec!(-1));
        assert!(rec.rates().state.is_zero());
    }

    #[test]
    fn test_empty_index() {
        let index = JurisdictionIndex::default();
        assert!(index.is_empty());
        assert!(index.lookup("90210").is_none());
    }
}
