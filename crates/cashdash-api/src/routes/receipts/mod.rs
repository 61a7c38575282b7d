//! Receipt routes - Upload, grouped listing, preview, delete

pub mod api;

pub use api::{
    api_receipt_delete, api_receipt_delete_by_name, api_receipt_options, api_receipt_upload,
    api_receipt_view, api_receipts,
};
