//! Transaction routes - List, filter, create, delete

pub mod api;

pub use api::{
    api_transaction_create, api_transaction_delete, api_transaction_detail, api_transaction_years,
    api_transactions,
};
