//! Account routes - Accounts and categories

pub mod api;

pub use api::{api_accounts, api_categories};
