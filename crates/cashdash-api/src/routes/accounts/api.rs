//! Accounts API endpoints - JSON API

use crate::AppState;
use axum::Json;
use cashdash_core::{Account, Category};

pub async fn api_accounts(state: axum::extract::State<AppState>) -> Json<Vec<Account>> {
    let ledger = state.ledger.read().await;
    Json(ledger.accounts().to_vec())
}

pub async fn api_categories(state: axum::extract::State<AppState>) -> Json<Vec<Category>> {
    let ledger = state.ledger.read().await;
    Json(ledger.categories().to_vec())
}
