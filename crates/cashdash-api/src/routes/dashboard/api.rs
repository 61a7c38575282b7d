//! Dashboard API endpoints - JSON API

use crate::routes::today;
use crate::AppState;
use axum::Json;
use cashdash_core::reports::DashboardResponse;
use cashdash_core::{BalancePoint, Ledger};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ManualBalanceRequest {
    pub value: Decimal,
}

fn dashboard_response(ledger: &Ledger) -> DashboardResponse {
    DashboardResponse::new(ledger.kpis(today()), ledger.transactions().len())
}

/// Headline figures for the current month
pub async fn api_dashboard(state: axum::extract::State<AppState>) -> Json<DashboardResponse> {
    let ledger = state.ledger.read().await;
    Json(dashboard_response(&ledger))
}

pub async fn api_balance_series(state: axum::extract::State<AppState>) -> Json<Vec<BalancePoint>> {
    let ledger = state.ledger.read().await;
    Json(ledger.balance_series())
}

/// Replace the computed balance with a user-entered one
pub async fn api_set_manual_balance(
    state: axum::extract::State<AppState>,
    Json(request): Json<ManualBalanceRequest>,
) -> Json<DashboardResponse> {
    let mut ledger = state.ledger.write().await;
    ledger.set_manual_balance(request.value);
    Json(dashboard_response(&ledger))
}

pub async fn api_clear_manual_balance(state: axum::extract::State<AppState>) -> Json<DashboardResponse> {
    let mut ledger = state.ledger.write().await;
    ledger.clear_manual_balance();
    Json(dashboard_response(&ledger))
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;
    use cashdash_store::{PaymentMethod, TransactionType};

    #[tokio::test]
    async fn test_dashboard_balance() {
        let (state, _dir) = state_with(vec![
            tx("1", TransactionType::Credit, "100", "2025-03-01", PaymentMethod::Cash),
            tx("2", TransactionType::Debit, "30", "2025-03-02", PaymentMethod::Card),
        ])
        .await;

        let (status, body) = get_json(&state, "/api/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kpis"]["balance"], serde_json::json!(70.0));
        assert_eq!(body["kpis"]["manual_balance"], serde_json::json!(false));
        assert_eq!(body["formatted"]["balance"], "R$ 70,00");
        assert_eq!(body["transaction_count"], 2);
    }

    #[tokio::test]
    async fn test_manual_balance_override_and_clear() {
        let (state, _dir) = state_with(vec![tx(
            "1",
            TransactionType::Credit,
            "100",
            "2025-03-01",
            PaymentMethod::Cash,
        )])
        .await;

        let (status, body) = send_json(
            &state,
            "PUT",
            "/api/dashboard/manual-balance",
            serde_json::json!({ "value": 1000 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["formatted"]["balance"], "R$ 1.000,00");
        assert_eq!(body["kpis"]["manual_balance"], serde_json::json!(true));

        let (_, body) = send_json(
            &state,
            "POST",
            "/api/transactions",
            serde_json::json!({ "type": "debit", "amount": 25, "purpose": "Taxi" }),
        )
        .await;
        assert_eq!(body["purpose"], "Taxi");

        let (_, body) = get_json(&state, "/api/dashboard").await;
        assert_eq!(body["formatted"]["balance"], "R$ 975,00");

        let (_, body) = send_json(&state, "DELETE", "/api/dashboard/manual-balance", serde_json::json!({})).await;
        assert_eq!(body["formatted"]["balance"], "R$ 75,00");
    }

    #[tokio::test]
    async fn test_balance_series() {
        let (state, _dir) = state_with(vec![
            tx("1", TransactionType::Credit, "100", "2025-03-01", PaymentMethod::Cash),
            tx("2", TransactionType::Debit, "30", "2025-03-02", PaymentMethod::Card),
        ])
        .await;

        let (_, body) = get_json(&state, "/api/dashboard/balance-series").await;
        let points = body.as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["label"], "01/03/2025");
        assert_eq!(points[1]["balance"], serde_json::json!(70.0));
    }
}
