//! Reports API endpoints - JSON API

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::Path;
use axum::Json;
use cashdash_core::reports::{MonthlyReport, PaymentMethodReport};
use cashdash_core::{ChartData, ChartKind};

/// Revenue and expense per month, oldest first
pub async fn api_monthly_report(state: axum::extract::State<AppState>) -> Json<MonthlyReport> {
    let ledger = state.ledger.read().await;
    Json(MonthlyReport::new(ledger.monthly()))
}

/// Debit totals per payment method
pub async fn api_payment_method_report(state: axum::extract::State<AppState>) -> Json<PaymentMethodReport> {
    let ledger = state.ledger.read().await;
    Json(PaymentMethodReport::new(ledger.payment_methods()))
}

/// Chart payload: `balance`, `monthly` or `payment-methods`
pub async fn api_chart(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<ChartData>> {
    let kind: ChartKind = kind.parse().map_err(|_| ApiError::not_found(format!("chart {}", kind)))?;
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.chart(kind)))
}
