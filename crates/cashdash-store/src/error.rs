//! Error types for cashdash-store

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Request failed: {message}")]
    Http { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Store responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode store response: {message}")]
    Decode { message: String },

    #[error("Store returned no rows")]
    EmptyResponse,

    #[error("Record not found: {id}")]
    NotFound { id: String },
}

impl StoreError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Http { .. } | StoreError::Timeout => true,
            StoreError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_decode() {
            StoreError::Decode { message: e.to_string() }
        } else {
            StoreError::Http { message: e.to_string() }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode { message: e.to_string() }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
