//! Route modules for the API server
//!
//! Each module follows the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTML page rendering, where there is one

pub mod accounts;
pub mod dashboard;
pub mod receipts;
pub mod reports;
pub mod settings;
pub mod transactions;

use chrono::{NaiveDate, Utc};

/// Date the dashboard treats as today
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
