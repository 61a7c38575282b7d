//! Error types for cashdash-core
//!
//! Validation and parse failures are returned to the caller. Store failures
//! are usually masked by a fallback in [`crate::Ledger`] and only reported
//! through an [`ErrorLogger`], whose level follows [`CoreError::severity`].

use cashdash_store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidFormat,
    StoreError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::StoreError => "STORE_ERROR",
        };
        f.write_str(code)
    }
}

/// How loudly a masked failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Caller mistake or a store hiccup worth retrying
    Warning,
    Error,
}

impl ErrorSeverity {
    pub fn level(self) -> log::Level {
        match self {
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error => log::Level::Error,
        }
    }
}

/// JSON error body: code, message, optional detail and hints
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError { message: message.into() }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::Store(_) => ErrorCode::StoreError,
        }
    }

    /// Transient store failures are warnings; rejected requests are errors
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Store(e) if !e.is_transient() => ErrorSeverity::Error,
            _ => ErrorSeverity::Warning,
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        let (details, suggestions) = match self {
            CoreError::ValidationError { message } => (
                Some(serde_json::json!({ "validation_message": message })),
                vec!["Amount and purpose are required; amount must be positive.".to_string()],
            ),
            CoreError::InvalidFormat { .. } => (
                None,
                vec!["Dates are YYYY-MM-DD or RFC 3339; years are numeric.".to_string()],
            ),
            CoreError::Store(e) if e.is_transient() => (None, vec!["Retry in a moment.".to_string()]),
            CoreError::Store(_) => (
                None,
                vec!["Check store.url and store.api_key in the config file.".to_string()],
            ),
        };

        ErrorDetails {
            code: self.code(),
            message: self.to_string(),
            details,
            suggestions,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// What was being attempted when a masked failure happened
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Sink for failures that are handled locally instead of returned
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Logs to the `cashdash::error` target at the error's severity
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::log!(
            target: "cashdash::error",
            error.severity().level(),
            "[{}] {} during {} {}",
            error.code(),
            error,
            context.operation,
            context.data
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_store_error() {
        assert_eq!(CoreError::validation("x").severity(), ErrorSeverity::Warning);
        assert_eq!(CoreError::from(StoreError::Timeout).severity(), ErrorSeverity::Warning);

        let rejected = StoreError::Status { status: 401, body: "bad key".to_string() };
        let error = CoreError::from(rejected);
        assert_eq!(error.severity(), ErrorSeverity::Error);
        assert_eq!(error.severity().level(), log::Level::Error);
    }

    #[test]
    fn test_validation_details() {
        let details = CoreError::validation("purpose is required").to_details();
        assert_eq!(details.code, ErrorCode::ValidationError);
        assert_eq!(details.details.unwrap()["validation_message"], "purpose is required");
        assert_eq!(details.suggestions.len(), 1);

        let body = serde_json::to_value(CoreError::validation("x").to_details()).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_store_error_keeps_source() {
        use std::error::Error as _;
        let error: CoreError = StoreError::Timeout.into();
        assert_eq!(error.code().to_string(), "STORE_ERROR");
        assert!(error.source().is_some());
        assert_eq!(error.to_details().suggestions, vec!["Retry in a moment.".to_string()]);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("add_transaction")
            .with_data("purpose", serde_json::json!("Lunch"));
        assert_eq!(context.operation, "add_transaction");
        assert_eq!(context.data["purpose"], "Lunch");
    }
}
