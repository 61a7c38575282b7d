//! Error types for cashdash-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cashdash_core::{CoreError, ErrorCode, ReceiptError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound { resource: resource.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e.code() {
                ErrorCode::ValidationError | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
                ErrorCode::StoreError => StatusCode::BAD_GATEWAY,
            },
            ApiError::Receipt(e) => match e {
                ReceiptError::NotFound { .. } | ReceiptError::NotAvailable { .. } => StatusCode::NOT_FOUND,
                ReceiptError::UnsupportedPreview { .. } | ReceiptError::RejectedType { .. } => {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE
                }
                ReceiptError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                ReceiptError::Invalid { .. } => StatusCode::BAD_REQUEST,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{} - {}", status, self);
        } else {
            log::debug!("{} - {}", status, self);
        }

        let body = match self {
            ApiError::Core(ref e) => serde_json::to_value(e.to_details())
                .unwrap_or_else(|_| serde_json::json!({ "message": e.to_string() })),
            ref other => serde_json::json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
