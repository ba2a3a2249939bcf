//! # Tax Resolver
//!
//! The `calculate-tax` operation: a pure function of an [`OrderRequest`] and
//! a [`JurisdictionIndex`].
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderRequest                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lookup buyer + seller ZIP ──── missing ───► InvalidZip                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  buyer state, then seller state ── differs ─► StateMismatch            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  line items ─────────────────── negative ──► InvalidLineItem           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pick jurisdiction (Origin → seller, anything else → buyer)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each product, in order:                                           │
//! │    subtotal = price × qty                                              │
//! │    useCustomTax?  subtotal = subtotal × customRate%                    │
//! │    exempt?        total price += subtotal, next product                │
//! │    state/city rate (halved for "50% Reduction")                        │
//! │    4 components, each rounded to cents, accumulated                    │
//! │    any amount out of decimal range ──► AmountOverflow                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TaxBreakdown                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::{Side, TaxError, TaxResult};
use crate::jurisdiction::{JurisdictionIndex, JurisdictionRates, JurisdictionRecord};
use crate::money::Money;
use crate::states::abbreviate;
use crate::types::{ComponentBreakdown, LineItem, OrderRequest, Sourcing, TaxBreakdown};
use crate::validation::validate_line_items;

/// Computes the tax breakdown for an order.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use ziptax_core::jurisdiction::{JurisdictionIndex, JurisdictionRates, JurisdictionRecord};
/// use ziptax_core::types::{LineItem, OrderRequest, TaxRate};
/// use ziptax_core::resolver::calculate_tax;
///
/// let index = JurisdictionIndex::build([(
///     "90210".to_string(),
///     JurisdictionRecord::new("CA", "BEVERLY HILLS", JurisdictionRates {
///         state: TaxRate::from_percentage(Decimal::new(6, 0)),
///         ..Default::default()
///     }),
/// )]);
///
/// let order = OrderRequest {
///     products: vec![LineItem {
///         price: Decimal::new(100, 0),
///         quantity: 1,
///         use_custom_tax: false,
///         custom_tax_rate: Decimal::ZERO,
///     }],
///     seller_zip: "90210".into(),
///     seller_state: "CA".into(),
///     buyer_zip: "90210".into(),
///     buyer_state: "California".into(),
///     delivery_method: None,
///     tax_rule_type: None,
///     is_tax_exempt: false,
///     tax_override_group: None,
/// };
///
/// let result = calculate_tax(&order, &index).unwrap();
/// assert_eq!(result.final_total.to_string(), "106.00");
/// ```
pub fn calculate_tax(order: &OrderRequest, index: &JurisdictionIndex) -> TaxResult<TaxBreakdown> {
    let (buyer, seller) = match (index.lookup(&order.buyer_zip), index.lookup(&order.seller_zip)) {
        (Some(buyer), Some(seller)) => (buyer, seller),
        _ => return Err(TaxError::InvalidZip),
    };

    check_state(Side::Buyer, &order.buyer_zip, &order.buyer_state, buyer)?;
    check_state(Side::Seller, &order.seller_zip, &order.seller_state, seller)?;
    validate_line_items(&order.products)?;

    let sourcing = order.sourcing();
    let jurisdiction = match sourcing {
        Sourcing::Origin => seller,
        Sourcing::Destination => buyer,
    };

    debug!(
        ?sourcing,
        region = jurisdiction.region_name(),
        products = order.products.len(),
        exempt = order.is_tax_exempt,
        "Resolving order"
    );

    let rates = effective_rates(order, jurisdiction.rates());
    let mut total_price = Money::zero();
    let mut breakdown = ComponentBreakdown::default();

    for item in &order.products {
        let subtotal = taxable_subtotal(item).ok_or(TaxError::AmountOverflow)?;
        total_price = total_price
            .checked_add(subtotal)
            .ok_or(TaxError::AmountOverflow)?;

        if order.is_tax_exempt {
            continue;
        }

        breakdown = accumulate_components(breakdown, subtotal, &rates)
            .ok_or(TaxError::AmountOverflow)?;
    }

    let total_tax = breakdown.checked_total().ok_or(TaxError::AmountOverflow)?;
    let final_total = total_price
        .checked_add(total_tax)
        .ok_or(TaxError::AmountOverflow)?;

    Ok(TaxBreakdown {
        delivery_method: order.delivery_method.clone(),
        tax_rule_type: order.tax_rule_type.clone(),
        tax_region: jurisdiction.region_name().to_string(),
        total_price,
        total_tax,
        final_total,
        breakdown,
    })
}

/// Compares a declared state, normalized, against the ZIP code's record.
fn check_state(
    side: Side,
    zip: &str,
    declared: &str,
    record: &JurisdictionRecord,
) -> TaxResult<()> {
    let state = abbreviate(declared);
    if record.state_code() == state {
        return Ok(());
    }

    Err(TaxError::StateMismatch {
        side,
        zip: zip.to_string(),
        state: state.to_string(),
        expected: record.state_code().to_string(),
    })
}

/// Price × quantity, replaced by its custom-rate share when requested.
///
/// The custom rate scales the subtotal itself: 50% on $200.00 leaves a
/// $100.00 subtotal that jurisdiction rates then apply to.
fn taxable_subtotal(item: &LineItem) -> Option<Money> {
    let subtotal = item.line_total()?;
    if item.use_custom_tax {
        subtotal.checked_scale_by(item.custom_rate())
    } else {
        Some(subtotal)
    }
}

/// Adds one product's four rounded components to the running breakdown.
fn accumulate_components(
    running: ComponentBreakdown,
    subtotal: Money,
    rates: &JurisdictionRates,
) -> Option<ComponentBreakdown> {
    Some(ComponentBreakdown {
        state_tax: running.state_tax.checked_add(subtotal.checked_tax(rates.state)?)?,
        county_tax: running.county_tax.checked_add(subtotal.checked_tax(rates.county)?)?,
        city_tax: running.city_tax.checked_add(subtotal.checked_tax(rates.city)?)?,
        special_tax: running.special_tax.checked_add(subtotal.checked_tax(rates.special)?)?,
    })
}

/// Jurisdiction rates after the order's override group.
///
/// Only state and city components are adjusted.
fn effective_rates(order: &OrderRequest, rates: &JurisdictionRates) -> JurisdictionRates {
    match &order.tax_override_group {
        Some(group) => JurisdictionRates {
            state: group.adjust(rates.state),
            city: group.adjust(rates.city),
            ..*rates
        },
        None => *rates,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{OverrideGroup, TaxRate, TaxRuleType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rates(state: Decimal, county: Decimal, city: Decimal, special: Decimal) -> JurisdictionRates {
        JurisdictionRates {
            combined: TaxRate::from_percentage(state + county + city + special),
            state: TaxRate::from_percentage(state),
            county: TaxRate::from_percentage(county),
            city: TaxRate::from_percentage(city),
            special: TaxRate::from_percentage(special),
        }
    }

    /// Synthetic index: Beverly Hills, Manhattan and a special-district ZIP.
    fn index() -> JurisdictionIndex {
        JurisdictionIndex::build([
            (
                "90210".to_string(),
                JurisdictionRecord::new(
                    "CA",
                    "BEVERLY HILLS",
                    rates(dec!(6), dec!(0.25), dec!(1), dec!(0)),
                ),
            ),
            (
                "10001".to_string(),
                JurisdictionRecord::new(
                    "NY",
                    "NEW YORK CITY",
                    rates(dec!(4), dec!(0), dec!(4.5), dec!(0.375)),
                ),
            ),
            (
                "60601".to_string(),
                JurisdictionRecord::new(
                    "IL",
                    "CHICAGO",
                    rates(dec!(7), dec!(1.75), dec!(1.25), dec!(0.25)),
                ),
            ),
        ])
    }

    fn item(price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            price,
            quantity,
            use_custom_tax: false,
            custom_tax_rate: Decimal::ZERO,
        }
    }

    fn order(products: Vec<LineItem>) -> OrderRequest {
        OrderRequest {
            products,
            seller_zip: "10001".to_string(),
            seller_state: "NY".to_string(),
            buyer_zip: "90210".to_string(),
            buyer_state: "CA".to_string(),
            delivery_method: Some("Shipping".to_string()),
            tax_rule_type: Some(TaxRuleType::DestinationBased),
            is_tax_exempt: false,
            tax_override_group: None,
        }
    }

    #[test]
    fn test_beverly_hills_destination_scenario() {
        let result = calculate_tax(&order(vec![item(dec!(100), 1)]), &index()).unwrap();

        assert_eq!(result.tax_region, "BEVERLY HILLS");
        assert_eq!(result.total_price.to_string(), "100.00");
        assert_eq!(result.breakdown.state_tax.to_string(), "6.00");
        assert_eq!(result.breakdown.city_tax.to_string(), "1.00");
        assert_eq!(result.breakdown.county_tax.to_string(), "0.25");
        assert_eq!(result.breakdown.special_tax.to_string(), "0.00");
        assert_eq!(result.total_tax.to_string(), "7.25");
        assert_eq!(result.final_total.to_string(), "107.25");
    }

    #[test]
    fn test_echoes_delivery_method_and_rule_type() {
        let mut o = order(vec![]);
        o.tax_rule_type = Some(TaxRuleType::Other("Hybrid".to_string()));
        let result = calculate_tax(&o, &index()).unwrap();

        assert_eq!(result.delivery_method.as_deref(), Some("Shipping"));
        assert_eq!(
            result.tax_rule_type,
            Some(TaxRuleType::Other("Hybrid".to_string()))
        );
        // Unrecognized rule types source from the buyer.
        assert_eq!(result.tax_region, "BEVERLY HILLS");
    }

    #[test]
    fn test_origin_based_uses_seller() {
        let mut o = order(vec![item(dec!(100), 1)]);
        o.tax_rule_type = Some(TaxRuleType::OriginBased);
        let result = calculate_tax(&o, &index()).unwrap();

        assert_eq!(result.tax_region, "NEW YORK CITY");
        assert_eq!(result.breakdown.state_tax.to_string(), "4.00");
        assert_eq!(result.breakdown.city_tax.to_string(), "4.50");
        assert_eq!(result.breakdown.special_tax.to_string(), "0.38");
        assert_eq!(result.total_tax.to_string(), "8.88");
    }

    #[test]
    fn test_absent_rule_type_uses_buyer() {
        let mut o = order(vec![item(dec!(100), 1)]);
        o.tax_rule_type = None;
        let result = calculate_tax(&o, &index()).unwrap();
        assert_eq!(result.tax_region, "BEVERLY HILLS");
        assert!(result.tax_rule_type.is_none());
    }

    #[test]
    fn test_unknown_buyer_zip_is_not_found() {
        let mut o = order(vec![item(dec!(100), 1)]);
        o.buyer_zip = "00000".to_string();
        let err = calculate_tax(&o, &index()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Invalid ZIP code.");
    }

    #[test]
    fn test_unknown_seller_zip_is_not_found() {
        let mut o = order(vec![]);
        o.seller_zip = String::new();
        assert_eq!(
            calculate_tax(&o, &index()).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_buyer_state_mismatch_names_expected_state() {
        let mut o = order(vec![item(dec!(100), 1)]);
        o.buyer_state = "Nevada".to_string();
        let err = calculate_tax(&o, &index()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Mismatch);
        assert_eq!(
            err.to_string(),
            "Buyer ZIP code 90210 does not match state NV. Expected: CA."
        );
    }

    #[test]
    fn test_buyer_checked_before_seller() {
        let mut o = order(vec![]);
        o.buyer_state = "TX".to_string();
        o.seller_state = "TX".to_string();
        match calculate_tax(&o, &index()).unwrap_err() {
            TaxError::StateMismatch { side, .. } => assert_eq!(side, Side::Buyer),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_seller_state_mismatch() {
        let mut o = order(vec![]);
        o.seller_state = "New Jersey".to_string();
        let err = calculate_tax(&o, &index()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Seller ZIP code 10001 does not match state NJ. Expected: NY."
        );
    }

    #[test]
    fn test_full_state_names_normalized() {
        let mut o = order(vec![item(dec!(10), 1)]);
        o.buyer_state = "California".to_string();
        o.seller_state = "New York".to_string();
        assert!(calculate_tax(&o, &index()).is_ok());
    }

    #[test]
    fn test_tax_exempt_accrues_no_tax() {
        let mut custom = item(dec!(100), 2);
        custom.use_custom_tax = true;
        custom.custom_tax_rate = dec!(50);

        let mut o = order(vec![item(dec!(19.99), 3), custom]);
        o.is_tax_exempt = true;
        let result = calculate_tax(&o, &index()).unwrap();

        assert!(result.total_tax.is_zero());
        assert_eq!(result.breakdown, ComponentBreakdown::default());
        // 59.97 + (200 × 50%)
        assert_eq!(result.total_price.to_string(), "159.97");
        assert_eq!(result.final_total.to_string(), "159.97");
    }

    #[test]
    fn test_half_rate_halves_state_and_city_only() {
        let products = vec![item(dec!(100), 1), item(dec!(40), 2)];
        let base = calculate_tax(&order(products.clone()), &index()).unwrap();

        let mut o = order(products);
        o.tax_override_group = Some(OverrideGroup::HalfRate);
        let halved = calculate_tax(&o, &index()).unwrap();

        assert_eq!(base.breakdown.state_tax.to_string(), "10.80");
        assert_eq!(halved.breakdown.state_tax.to_string(), "5.40");
        assert_eq!(base.breakdown.city_tax.to_string(), "1.80");
        assert_eq!(halved.breakdown.city_tax.to_string(), "0.90");
        assert_eq!(halved.breakdown.county_tax, base.breakdown.county_tax);
        assert_eq!(halved.breakdown.special_tax, base.breakdown.special_tax);
    }

    #[test]
    fn test_unrecognized_override_group_has_no_effect() {
        let base = calculate_tax(&order(vec![item(dec!(100), 1)]), &index()).unwrap();
        let mut o = order(vec![item(dec!(100), 1)]);
        o.tax_override_group = Some(OverrideGroup::Unrecognized("Nonprofit".to_string()));
        let result = calculate_tax(&o, &index()).unwrap();
        assert_eq!(result.breakdown, base.breakdown);
    }

    #[test]
    fn test_custom_tax_scales_subtotal() {
        let mut custom = item(dec!(100), 2);
        custom.use_custom_tax = true;
        custom.custom_tax_rate = dec!(50);
        let result = calculate_tax(&order(vec![custom]), &index()).unwrap();

        assert_eq!(result.total_price.to_string(), "100.00");
        assert_eq!(result.breakdown.state_tax.to_string(), "6.00");
        assert_eq!(result.final_total.to_string(), "107.25");
    }

    #[test]
    fn test_custom_rate_ignored_without_flag() {
        let mut plain = item(dec!(100), 2);
        plain.custom_tax_rate = dec!(50);
        let result = calculate_tax(&order(vec![plain]), &index()).unwrap();
        assert_eq!(result.total_price.to_string(), "200.00");
    }

    #[test]
    fn test_rounding_is_per_product() {
        // Each subtotal is 20.01 × 50% = 10.005; 7% of that is 0.70035.
        let mut half = item(dec!(20.01), 1);
        half.use_custom_tax = true;
        half.custom_tax_rate = dec!(50);

        let mut o = order(vec![half.clone(), half]);
        o.buyer_zip = "60601".to_string();
        o.buyer_state = "Illinois".to_string();
        let result = calculate_tax(&o, &index()).unwrap();

        assert_eq!(result.breakdown.state_tax.amount(), dec!(1.40));
        assert_eq!(result.total_price.amount(), dec!(20.010));
    }

    #[test]
    fn test_rounding_half_up_per_component() {
        // 8.25 × 1.75% = 0.144375 → 0.14 ; 8.25 × 0.25% = 0.020625 → 0.02
        // 8.25 × 7% = 0.5775 → 0.58 ; 8.25 × 1.25% = 0.103125 → 0.10
        let mut o = order(vec![item(dec!(8.25), 1)]);
        o.buyer_zip = "60601".to_string();
        o.buyer_state = "IL".to_string();
        let result = calculate_tax(&o, &index()).unwrap();

        assert_eq!(result.breakdown.state_tax.to_string(), "0.58");
        assert_eq!(result.breakdown.county_tax.to_string(), "0.14");
        assert_eq!(result.breakdown.city_tax.to_string(), "0.10");
        assert_eq!(result.breakdown.special_tax.to_string(), "0.02");
        assert_eq!(result.total_tax.to_string(), "0.84");
        assert_eq!(result.final_total.to_string(), "9.09");
    }

    #[test]
    fn test_empty_order() {
        let result = calculate_tax(&order(vec![]), &index()).unwrap();
        assert_eq!(result.total_price.to_string(), "0.00");
        assert_eq!(result.final_total.to_string(), "0.00");
        assert_eq!(result.tax_region, "BEVERLY HILLS");
    }

    #[test]
    fn test_negative_price_rejected_before_tax() {
        let err = calculate_tax(&order(vec![item(dec!(1), 1), item(dec!(-5), 1)]), &index())
            .unwrap_err();
        match err {
            TaxError::InvalidLineItem { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_huge_quantity_total_is_an_error() {
        let o = order(vec![item(dec!(70000000000000000000000000000), 2)]);
        let err = calculate_tax(&o, &index()).unwrap_err();
        assert!(matches!(err, TaxError::AmountOverflow));
    }

    #[test]
    fn test_huge_tax_component_is_an_error() {
        // Subtotal fits, subtotal × 6 does not.
        let o = order(vec![item(dec!(70000000000000000000000000000), 1)]);
        let err = calculate_tax(&o, &index()).unwrap_err();
        assert!(matches!(err, TaxError::AmountOverflow));
    }

    #[test]
    fn test_huge_running_total_is_an_error() {
        let mut o = order(vec![
            item(dec!(50000000000000000000000000000), 1),
            item(dec!(50000000000000000000000000000), 1),
        ]);
        o.is_tax_exempt = true;
        let err = calculate_tax(&o, &index()).unwrap_err();
        assert!(matches!(err, TaxError::AmountOverflow));
    }

    #[test]
    fn test_huge_custom_rate_is_an_error() {
        let mut huge = item(dec!(10), 1);
        huge.use_custom_tax = true;
        huge.custom_tax_rate = Decimal::MAX;
        let err = calculate_tax(&order(vec![huge]), &index()).unwrap_err();
        assert!(matches!(err, TaxError::AmountOverflow));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut o = order(vec![item(dec!(12.34), 3), item(dec!(0.99), 7)]);
        o.tax_override_group = Some(OverrideGroup::HalfRate);
        let idx = index();

        let first = calculate_tax(&o, &idx).unwrap();
        let second = calculate_tax(&o, &idx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_total_tax_is_sum_of_components() {
        let o = order(vec![item(dec!(3.33), 3), item(dec!(7.77), 1), item(dec!(0.05), 9)]);
        let result = calculate_tax(&o, &index()).unwrap();
        let b = result.breakdown;
        assert_eq!(
            result.total_tax.amount(),
            b.state_tax.amount() + b.county_tax.amount() + b.city_tax.amount() + b.special_tax.amount()
        );
        assert_eq!(
            result.final_total.amount(),
            result.total_price.amount() + result.total_tax.amount()
        );
    }
}
