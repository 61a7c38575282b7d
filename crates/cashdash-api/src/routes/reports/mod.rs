//! Report routes - Aggregates and chart payloads

pub mod api;

pub use api::{api_chart, api_monthly_report, api_payment_method_report};
