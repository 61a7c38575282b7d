//! Error types for cashdash-config
//!
//! Every variant keeps enough of its cause (path, YAML position, setting
//! name) to tell the operator what to fix before the server starts.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Malformed YAML{}: {message}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    InvalidYaml { message: String, line: Option<usize> },

    #[error("Missing required setting: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        ConfigError::InvalidValue { field: field.to_string(), reason: reason.to_string() }
    }

    /// Stable identifier, e.g. `INVALID_VALUE`
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "FILE_NOT_FOUND",
            ConfigError::InvalidYaml { .. } => "INVALID_YAML",
            ConfigError::MissingField { .. } => "MISSING_FIELD",
            ConfigError::InvalidValue { .. } => "INVALID_VALUE",
            ConfigError::Io { .. } => "IO_ERROR",
        }
    }

    /// Setting path the error is about, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MissingField { field } | ConfigError::InvalidValue { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            ConfigError::FileNotFound { .. } => {
                Some("Pass --config <path>, or run with --print-default-config for a template.".to_string())
            }
            ConfigError::MissingField { field } if field == "store.api_key" => {
                Some("A store URL needs its API key; remove store.url to run in memory.".to_string())
            }
            ConfigError::MissingField { field } => Some(format!("Add '{}' to the config file.", field)),
            ConfigError::InvalidYaml { .. } => Some("Compare with --print-default-config.".to_string()),
            _ => None,
        }
    }

    /// Report for printing or serializing
    pub fn to_details(&self) -> ConfigErrorDetails {
        ConfigErrorDetails {
            code: self.code(),
            message: self.to_string(),
            field: self.field().map(str::to_string),
            hint: self.hint(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(error: serde_yaml::Error) -> Self {
        ConfigError::InvalidYaml {
            line: error.location().map(|l| l.line()),
            message: error.to_string(),
        }
    }
}

/// Operator-facing summary of a [`ConfigError`]
#[derive(Debug, Clone, Serialize)]
pub struct ConfigErrorDetails {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        if let Some(ref hint) = self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
