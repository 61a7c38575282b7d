//! Persisted client preferences
//!
//! Only the theme is remembered. The file is read once at startup and
//! rewritten on every change.

use crate::error::{ConfigError, ConfigResult};
use crate::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Theme chosen by the user, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Preferences {
    /// Read preferences; a missing file is an empty set of preferences
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write preferences, creating the parent directory when needed
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
            }
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }

    /// Stored theme, then the system preference, then light
    pub fn resolve_theme(&self, prefers_dark: bool) -> Theme {
        match self.theme {
            Some(theme) => theme,
            None if prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }
}

/// Theme store bound to a preferences file
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
    current: Theme,
}

impl ThemeStore {
    /// Resolve the startup theme from the file at `path`
    pub fn open(path: PathBuf, prefers_dark: bool) -> Self {
        let prefs = match Preferences::load(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                log::error!("Failed to read preferences {}: {}", path.display(), e);
                Preferences::default()
            }
        };
        let current = prefs.resolve_theme(prefers_dark);
        Self { path, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Change the theme and persist it. The in-memory value changes even
    /// when the write fails.
    pub fn set(&mut self, theme: Theme) -> ConfigResult<Theme> {
        self.current = theme;
        let prefs = Preferences { theme: Some(theme) };
        prefs.save(&self.path)?;
        Ok(theme)
    }

    pub fn toggle(&mut self) -> ConfigResult<Theme> {
        self.set(self.current.toggled())
    }
}
