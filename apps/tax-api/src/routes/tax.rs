//! `POST /calculate-tax`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{info, info_span, warn};
use uuid::Uuid;
use ziptax_core::{calculate_tax, OrderRequest, TaxBreakdown};

use crate::error::ApiError;
use crate::AppState;

/// Calculates the tax breakdown for an order.
///
/// ## Responses
/// - 200 with [`TaxBreakdown`]
/// - 400 `{ "error": ... }` for unknown ZIPs, state mismatches, invalid
///   line items and bodies that are not a valid order
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<TaxBreakdown>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("calculate_tax", %request_id);

    let Json(order) = payload.inspect_err(|rejection| {
        span.in_scope(|| warn!(reason = %rejection.body_text(), "Rejected order body"))
    })?;

    let result = span.in_scope(|| {
        let result = calculate_tax(&order, &state.index);
        match &result {
            Ok(breakdown) => info!(
                tax_region = %breakdown.tax_region,
                products = order.products.len(),
                total_tax = %breakdown.total_tax,
                "Tax calculated"
            ),
            Err(e) => warn!(kind = ?e.kind(), error = %e, "Tax calculation refused"),
        }
        result
    });

    Ok(Json(result?))
}
