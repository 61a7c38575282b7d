//! Dashboard routes - KPIs, manual balance, HTML dashboard

pub mod api;
pub mod page;

pub use api::{api_balance_series, api_clear_manual_balance, api_dashboard, api_set_manual_balance};
pub use page::page_dashboard;
