//! # State Abbreviations
//!
//! Normalizes caller-supplied state names to the two-letter codes stored in
//! the rate table, so `"California"` and `"CA"` compare equal.

/// Full state name → USPS two-letter code.
const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Returns the two-letter code for a full state name.
///
/// Codes and unknown values come back unchanged, so applying this twice is
/// the same as applying it once.
///
/// ```rust
/// use ziptax_core::states::abbreviate;
///
/// assert_eq!(abbreviate("California"), "CA");
/// assert_eq!(abbreviate("CA"), "CA");
/// assert_eq!(abbreviate("Atlantis"), "Atlantis");
/// ```
pub fn abbreviate(state: &str) -> &str {
    STATE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, code)| *code)
        .unwrap_or(state)
}
