//! # Rate Table Loader
//!
//! Builds a [`JurisdictionIndex`] from the published rate table.
//!
//! ## Source Format
//! ```text
//! Zip Code,State,TaxRegionName,EstimatedCombinedRate,StateRate,EstimatedCountyRate,EstimatedCityRate,EstimatedSpecialRate
//! 90210,CA,BEVERLY HILLS,0.0725,0.06,0.0025,0.01,0
//! ```
//!
//! Columns are located by header name. Rate cells are decimal fractions and
//! are stored as percentages (`0.0725` → `7.25`).

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use ziptax_core::jurisdiction::{JurisdictionIndex, JurisdictionRates, JurisdictionRecord};
use ziptax_core::types::TaxRate;

use crate::error::{RatesError, RatesResult};

pub const ZIP_CODE: &str = "Zip Code";
pub const STATE: &str = "State";
pub const TAX_REGION_NAME: &str = "TaxRegionName";
pub const COMBINED_RATE: &str = "EstimatedCombinedRate";
pub const STATE_RATE: &str = "StateRate";
pub const COUNTY_RATE: &str = "EstimatedCountyRate";
pub const CITY_RATE: &str = "EstimatedCityRate";
pub const SPECIAL_RATE: &str = "EstimatedSpecialRate";

// =============================================================================
// Public API
// =============================================================================

/// Loads the rate table at `path`.
///
/// ## Errors
/// Fails if the file cannot be opened, the CSV is structurally broken, or
/// the header lacks `Zip Code` or `State`. Individual bad cells do not fail.
pub fn load_from_path(path: impl AsRef<Path>) -> RatesResult<JurisdictionIndex> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| RatesError::open(path, e))?;

    let index = load_from_reader(file)?;
    info!(path = %path.display(), zips = index.len(), "Tax rates loaded successfully");
    Ok(index)
}

/// Loads a rate table from any reader (file, in-memory buffer, ...).
pub fn load_from_reader<R: Read>(reader: R) -> RatesResult<JurisdictionIndex> {
    let mut csv = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::locate(csv.headers()?)?;

    let mut rows = 0usize;
    let mut skipped = 0usize;
    let mut entries = Vec::new();

    for result in csv.records() {
        let record = result?;
        rows += 1;

        match columns.parse(&record) {
            Some(entry) => entries.push(entry),
            None => {
                skipped += 1;
                warn!(
                    line = ?record.position().map(|p| p.line()),
                    "Skipping rate table row without a ZIP code"
                );
            }
        }
    }

    let index = JurisdictionIndex::build(entries);
    debug!(rows, skipped, zips = index.len(), "Rate table parsed");
    Ok(index)
}

/// Parses a rate cell given as a decimal fraction.
///
/// The leading number of the cell is used and anything after it is ignored
/// (`0.0725%` reads as `0.0725`). Missing cells, cells without a leading
/// number, and values too large for a percentage are 0. Scientific notation
/// (`7.25e-2`) is accepted.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use ziptax_rates::loader::parse_rate;
///
/// assert_eq!(parse_rate(Some("0.0725")).percentage(), Decimal::new(725, 2));
/// assert_eq!(parse_rate(Some("0.0725%")).percentage(), Decimal::new(725, 2));
/// assert!(parse_rate(Some("n/a")).is_zero());
/// assert!(parse_rate(None).is_zero());
/// ```
pub fn parse_rate(cell: Option<&str>) -> TaxRate {
    cell.map(numeric_prefix)
        .filter(|number| !number.is_empty())
        .and_then(|number| {
            Decimal::from_str(number)
                .or_else(|_| Decimal::from_scientific(number))
                .ok()
        })
        .and_then(TaxRate::from_fraction)
        .unwrap_or_default()
}

/// The longest leading `[+-]digits[.digits][e[+-]digits]` slice of `cell`,
/// or `""` when the cell does not start with a number.
fn numeric_prefix(cell: &str) -> &str {
    let bytes = cell.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    if int_end == end {
        return "";
    }
    end = int_end;

    // A dot only belongs to the number when digits follow it.
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 {
            end = frac_end;
        }
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    &cell[..end]
}

// =============================================================================
// Column Mapping
// =============================================================================

/// Positions of the known columns in the header row.
#[derive(Debug)]
struct Columns {
    zip: usize,
    state: usize,
    region: Option<usize>,
    combined: Option<usize>,
    state_rate: Option<usize>,
    county: Option<usize>,
    city: Option<usize>,
    special: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> RatesResult<Self> {
        // Spreadsheet exports often prefix the first header with a BOM.
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
        };

        Ok(Columns {
            zip: find(ZIP_CODE).ok_or(RatesError::MissingColumn(ZIP_CODE))?,
            state: find(STATE).ok_or(RatesError::MissingColumn(STATE))?,
            region: find(TAX_REGION_NAME),
            combined: find(COMBINED_RATE),
            state_rate: find(STATE_RATE),
            county: find(COUNTY_RATE),
            city: find(CITY_RATE),
            special: find(SPECIAL_RATE),
        })
    }

    /// Turns one row into an index entry, or `None` if it has no ZIP code.
    fn parse(&self, record: &StringRecord) -> Option<(String, JurisdictionRecord)> {
        let zip = record.get(self.zip).filter(|z| !z.is_empty())?;
        let cell = |column: Option<usize>| column.and_then(|i| record.get(i));

        let rates = JurisdictionRates {
            combined: parse_rate(cell(self.combined)),
            state: parse_rate(cell(self.state_rate)),
            county: parse_rate(cell(self.county)),
            city: parse_rate(cell(self.city)),
            special: parse_rate(cell(self.special)),
        };

        Some((
            zip.to_string(),
            JurisdictionRecord::new(
                record.get(self.state).unwrap_or_default(),
                cell(self.region).unwrap_or_default(),
                rates,
            ),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
