//! HTTP API server and dashboard page
//!
//! Routes are organized into modules:
//! - routes::dashboard: KPIs, balance override, the HTML dashboard
//! - routes::transactions: List, filter, create, delete
//! - routes::accounts: Accounts and categories
//! - routes::reports: Monthly, payment-method and chart data
//! - routes::receipts: Receipt upload, listing and preview
//! - routes::settings: Configuration and theme

pub mod error;
pub mod routes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use cashdash_config::{Config, ThemeStore};
use cashdash_core::{Ledger, ReceiptRegistry};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Slack above `receipts.max_upload_bytes` so an oversized receipt reaches
/// the registry and gets its JSON 413 instead of the transport's
const UPLOAD_BODY_HEADROOM: usize = 1024 * 1024;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub receipts: Arc<RwLock<ReceiptRegistry>>,
    pub theme: Arc<RwLock<ThemeStore>>,
    pub config: Config,
}

impl AppState {
    /// State around a loaded ledger; receipts start empty and the theme is
    /// read from the preferences file
    pub fn new(config: Config, ledger: Ledger) -> Self {
        let receipts = ReceiptRegistry::new(&config.receipts);
        let theme = ThemeStore::open(config.ui.preferences_file.clone(), config.ui.prefers_dark);
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            receipts: Arc::new(RwLock::new(receipts)),
            theme: Arc::new(RwLock::new(theme)),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{api_accounts, api_categories};
    use routes::dashboard::{
        api_balance_series, api_clear_manual_balance, api_dashboard, api_set_manual_balance, page_dashboard,
    };
    use routes::receipts::{
        api_receipt_delete, api_receipt_delete_by_name, api_receipt_options, api_receipt_upload,
        api_receipt_view, api_receipts,
    };
    use routes::reports::{api_chart, api_monthly_report, api_payment_method_report};
    use routes::settings::{api_set_theme, api_settings, api_theme, api_toggle_theme};
    use routes::transactions::{
        api_transaction_create, api_transaction_delete, api_transaction_detail, api_transaction_years,
        api_transactions,
    };

    let body_limit = state.config.receipts.max_upload_bytes.saturating_add(UPLOAD_BODY_HEADROOM);

    Router::new()
        .route("/api/health", get(health_check))
        // Dashboard
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/dashboard/balance-series", get(api_balance_series))
        .route(
            "/api/dashboard/manual-balance",
            put(api_set_manual_balance).delete(api_clear_manual_balance),
        )
        // Transactions
        .route("/api/transactions", get(api_transactions).post(api_transaction_create))
        .route("/api/transactions/years", get(api_transaction_years))
        .route(
            "/api/transactions/:id",
            get(api_transaction_detail).delete(api_transaction_delete),
        )
        .route("/api/accounts", get(api_accounts))
        .route("/api/categories", get(api_categories))
        // Reports
        .route("/api/reports/monthly", get(api_monthly_report))
        .route("/api/reports/payment-methods", get(api_payment_method_report))
        .route("/api/reports/charts/:kind", get(api_chart))
        // Receipts
        .route("/api/receipts/:tab", get(api_receipts).post(api_receipt_upload))
        .route("/api/receipts/:tab/options", get(api_receipt_options))
        .route("/api/receipts/:tab/by-name/:name", delete(api_receipt_delete_by_name))
        .route("/api/receipts/:tab/:id", delete(api_receipt_delete))
        .route("/api/receipts/:tab/:id/view", get(api_receipt_view))
        // Settings
        .route("/api/settings", get(api_settings))
        .route("/api/theme", get(api_theme).put(api_set_theme))
        .route("/api/theme/toggle", post(api_toggle_theme))
        // Pages
        .route("/", get(page_dashboard))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, theme_class: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR" class="{}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - CashDash</title>
    <script>tailwind = {{ config: {{ darkMode: 'class' }} }}</script>
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
</head>
<body class="bg-gray-50 text-gray-900 dark:bg-gray-900 dark:text-gray-100">
    {}
</body>
</html>"#,
        theme_class, title, content
    )
}

/// Start the HTTP server
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_address();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting CashDash server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /api/transactions (Transaction log)");
    log::info!("  - /api/reports/* (Chart data)");
    log::info!("  - /api/receipts/:tab (Receipts)");
    log::info!("  - /api/theme (Theme preference)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}
