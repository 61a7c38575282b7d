//! Transactions API endpoints - JSON API
//!
//! Endpoints:
//! - api_transactions: Filtered list (`q`, `month`, `year`, `type`)
//! - api_transaction_years: Options for the month and year selects
//! - api_transaction_detail: Single transaction
//! - api_transaction_create: Validate and store a new transaction
//! - api_transaction_delete: Remove a transaction

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use cashdash_core::reports::TransactionsResponse;
use cashdash_core::time::month_names;
use cashdash_core::{Transaction, TransactionFilter, TransactionForm};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

/// Filtered transactions, newest first
pub async fn api_transactions(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Json<TransactionsResponse>> {
    let ledger = state.ledger.read().await;
    let filter = TransactionFilter::from_params(
        params.get("q").map(String::as_str),
        params.get("month").map(String::as_str),
        params.get("year").map(String::as_str),
        params.get("type").map(String::as_str),
        ledger.locale(),
    )?;
    Ok(Json(TransactionsResponse::new(ledger.filtered(&filter))))
}

#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub months: Vec<&'static str>,
}

pub async fn api_transaction_years(state: axum::extract::State<AppState>) -> Json<FilterOptions> {
    let ledger = state.ledger.read().await;
    Json(FilterOptions {
        years: ledger.available_years(),
        months: month_names(ledger.locale()).to_vec(),
    })
}

pub async fn api_transaction_detail(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    let ledger = state.ledger.read().await;
    ledger
        .transaction(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("transaction {}", id)))
}

// The ledger lock is never held across a store call.

pub async fn api_transaction_create(
    state: axum::extract::State<AppState>,
    Json(form): Json<TransactionForm>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let new = form.into_new(Utc::now())?;
    let store = state.ledger.read().await.store();
    let stored = store.add_transaction(new.clone()).await;
    let tx = state.ledger.write().await.commit_add(new, stored);
    Ok((StatusCode::CREATED, Json(tx)))
}

pub async fn api_transaction_delete(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    let store = state.ledger.read().await.store();
    let deleted = store.delete_transaction(&id).await;
    state
        .ledger
        .write()
        .await
        .commit_delete(&id, deleted)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("transaction {}", id)))
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use cashdash_store::{
        Account, Category, MemoryStore, NewTransaction, PaymentMethod, StoreResult, Transaction,
        TransactionStoreTrait, TransactionType,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Memory store whose writes wait until released
    #[derive(Default)]
    struct GatedStore {
        inner: MemoryStore,
        entered: Notify,
        release: Notify,
    }

    impl GatedStore {
        async fn gate(&self) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    #[async_trait]
    impl TransactionStoreTrait for GatedStore {
        async fn fetch_transactions(&self) -> StoreResult<Vec<Transaction>> {
            self.inner.fetch_transactions().await
        }
        async fn fetch_accounts(&self) -> StoreResult<Vec<Account>> {
            self.inner.fetch_accounts().await
        }
        async fn fetch_categories(&self) -> StoreResult<Vec<Category>> {
            self.inner.fetch_categories().await
        }
        async fn add_transaction(&self, new: NewTransaction) -> StoreResult<Transaction> {
            self.gate().await;
            self.inner.add_transaction(new).await
        }
        async fn delete_transaction(&self, id: &str) -> StoreResult<()> {
            self.gate().await;
            self.inner.delete_transaction(id).await
        }
        fn name(&self) -> &'static str {
            "gated"
        }
    }

    fn sample() -> Vec<Transaction> {
        let mut lunch = tx("1", TransactionType::Debit, "12.50", "2025-03-01", PaymentMethod::Cash);
        lunch.purpose = "Lunch".to_string();
        let mut salary = tx("2", TransactionType::Credit, "3000", "2025-03-05", PaymentMethod::Transfer);
        salary.purpose = "Salary".to_string();
        let old = tx("3", TransactionType::Debit, "40", "2024-11-20", PaymentMethod::Card);
        vec![lunch, salary, old]
    }

    fn ids(body: &serde_json::Value) -> Vec<String> {
        body["transactions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (state, _dir) = state_with(sample()).await;
        let (status, body) = get_json(&state, "/api/transactions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["2", "1", "3"]);
        assert_eq!(body["total_count"], 3);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (state, _dir) = state_with(sample()).await;

        let (_, body) = get_json(&state, "/api/transactions?q=lun").await;
        assert_eq!(ids(&body), vec!["1"]);

        let (_, body) = get_json(&state, "/api/transactions?type=credit&month=Todos&year=Todos").await;
        assert_eq!(ids(&body), vec!["2"]);

        let (_, body) = get_json(&state, "/api/transactions?month=mar%C3%A7o&year=2025").await;
        assert_eq!(ids(&body), vec!["2", "1"]);

        let (status, _) = get_json(&state, "/api/transactions?year=soon").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_filter_options() {
        let (state, _dir) = state_with(sample()).await;
        let (_, body) = get_json(&state, "/api/transactions/years").await;
        assert_eq!(body["years"], serde_json::json!([2025, 2024]));
        assert_eq!(body["months"][2], "março");
    }

    #[tokio::test]
    async fn test_create_uses_form_defaults() {
        let (state, _dir) = state_with(vec![]).await;
        let (status, body) = send_json(
            &state,
            "POST",
            "/api/transactions",
            serde_json::json!({ "amount": 15.5, "purpose": "Coffee" }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], "debit");
        assert_eq!(body["paymentMethod"], "cash");

        let (_, list) = get_json(&state, "/api/transactions").await;
        assert_eq!(list["total_count"], 1);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let (state, _dir) = state_with(vec![]).await;
        let (status, body) = send_json(
            &state,
            "POST",
            "/api/transactions",
            serde_json::json!({ "amount": 10, "purpose": "  " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["details"]["validation_message"],
            "Por favor, preencha todos os campos obrigatórios."
        );

        let (status, _) = send_json(
            &state,
            "POST",
            "/api/transactions",
            serde_json::json!({ "amount": 0, "purpose": "Nothing" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = get_json(&state, "/api/transactions").await;
        assert_eq!(list["total_count"], 0);
    }

    #[tokio::test]
    async fn test_detail_and_delete() {
        let (state, _dir) = state_with(sample()).await;

        let (status, body) = get_json(&state, "/api/transactions/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["purpose"], "Lunch");

        let (status, _) = send_json(&state, "DELETE", "/api/transactions/1", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_json(&state, "/api/transactions/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send_json(&state, "DELETE", "/api/transactions/missing", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reads_proceed_during_store_write() {
        let store = Arc::new(GatedStore::default());
        let (state, _dir) = state_over(store.clone()).await;

        let writer = {
            let state = state.clone();
            tokio::spawn(async move {
                send_json(
                    &state,
                    "POST",
                    "/api/transactions",
                    serde_json::json!({ "amount": 8, "purpose": "Taxi" }),
                )
                .await
            })
        };
        store.entered.notified().await;

        let (status, _) = tokio::time::timeout(Duration::from_millis(500), get_json(&state, "/api/dashboard"))
            .await
            .expect("dashboard waited on the store write");
        assert_eq!(status, StatusCode::OK);

        store.release.notify_one();
        let (status, body) = writer.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let path = format!("/api/transactions/{}", body["id"].as_str().unwrap());
        let deleter = {
            let state = state.clone();
            tokio::spawn(async move { send_json(&state, "DELETE", &path, serde_json::json!({})).await })
        };
        store.entered.notified().await;

        let (_, list) = tokio::time::timeout(Duration::from_millis(500), get_json(&state, "/api/transactions"))
            .await
            .expect("list waited on the store delete");
        assert_eq!(list["total_count"], 1);

        store.release.notify_one();
        let (status, _) = deleter.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }
}
