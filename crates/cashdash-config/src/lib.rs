//! Configuration management for cashdash
//!
//! Settings come from one YAML file where every field has a default, so an
//! empty or missing file yields a runnable in-memory setup. The theme the
//! user picks is kept apart in [`preferences`].

pub mod error;
pub mod preferences;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;
pub use preferences::{Preferences, ThemeStore};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Remote store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the PostgREST-compatible endpoint (empty = in-memory only)
    #[serde(default)]
    pub url: String,
    /// API key sent as `apikey` and bearer token
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Whether a remote store has been configured
    pub fn is_remote(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Stand-in for the OS colour-scheme preference
    #[serde(default)]
    pub prefers_dark: bool,
    /// Where the chosen theme is persisted
    #[serde(default = "default_preferences_file")]
    pub preferences_file: PathBuf,
    /// Locale used for month names and date labels
    #[serde(default)]
    pub locale: Locale,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            prefers_dark: false,
            preferences_file: default_preferences_file(),
            locale: Locale::default(),
        }
    }
}

fn default_preferences_file() -> PathBuf {
    PathBuf::from("./preferences.yaml")
}

/// Receipt upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptsConfig {
    /// Largest accepted upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Accepted MIME types
    #[serde(default = "default_accepted_types")]
    pub accepted_types: Vec<String>,
}

impl Default for ReceiptsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            accepted_types: default_accepted_types(),
        }
    }
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_accepted_types() -> Vec<String> {
    vec![
        "application/pdf".to_string(),
        "image/jpeg".to_string(),
        "image/png".to_string(),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Locale for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    /// Brazilian Portuguese
    #[serde(rename = "pt-br", alias = "pt-BR", alias = "pt_BR")]
    PtBr,
    /// US English
    #[serde(rename = "en-us", alias = "en-US", alias = "en_US")]
    EnUs,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::PtBr
    }
}

impl std::str::FromStr for Locale {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en-us" | "en" => Ok(Locale::EnUs),
            _ => Err(format!("Invalid locale: {}", s)),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::PtBr => write!(f, "pt-br"),
            Locale::EnUs => write!(f, "en-us"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
    /// Receipt settings
    #[serde(default)]
    pub receipts: ReceiptsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound { path });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::io(&path, e))?;

        Self::from_yaml(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: PathBuf) -> Result<Self, ConfigError> {
        match Self::load(path.clone()) {
            Err(ConfigError::FileNotFound { .. }) => {
                log::warn!(
                    "Config file {} not found, using defaults",
                    path.to_string_lossy()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be greater than 0"));
        }
        if self.store.timeout_secs == 0 {
            return Err(ConfigError::invalid("store.timeout_secs", "must be at least one second"));
        }
        if self.store.is_remote() && self.store.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "store.api_key".to_string() });
        }
        if self.receipts.accepted_types.is_empty() {
            return Err(ConfigError::invalid("receipts.accepted_types", "at least one MIME type is required"));
        }
        if self.receipts.max_upload_bytes == 0 {
            return Err(ConfigError::invalid("receipts.max_upload_bytes", "must be greater than 0"));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                &format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert!(!config.store.is_remote());
        assert_eq!(config.ui.locale, Locale::PtBr);
        assert_eq!(config.receipts.accepted_types.len(), 3);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));
    }

    #[test]
    fn test_remote_store_requires_key() {
        let err = Config::from_yaml("store:\n  url: \"http://localhost:3000\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field } if field == "store.api_key"));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load_or_default(PathBuf::from("/nonexistent/cashdash.yaml")).unwrap();
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_theme_and_locale_parsing() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!("pt_BR".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!(Locale::EnUs.to_string(), "en-us");
    }
}
