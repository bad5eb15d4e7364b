//! Configuration types for devfinder.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use devfinder_search::SearchConfig;

use crate::error::AppError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider endpoints and request behaviour.
    pub search: SearchConfig,
    /// Where and how long the last result set is kept.
    pub session: SessionConfig,
    /// Search controller behaviour.
    pub controller: ControllerConfig,
}

/// Storage medium behind the result cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    /// JSON files under the session directory; survives process restarts.
    #[default]
    File,
    /// Process-local memory; gone when the process exits.
    Memory,
}

/// Session-scoped storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Storage backend.
    pub backend: SessionBackend,
    /// A session whose data has not been touched for this long has ended.
    pub idle_timeout_minutes: u64,
    /// Session root directory override (file backend only).
    pub dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::File,
            idle_timeout_minutes: 30,
            dir: None,
        }
    }
}

impl SessionConfig {
    /// The directory that holds per-session subdirectories.
    pub fn root(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(crate::devfinder_dirs::session_root)
    }

    /// Idle timeout as a [`std::time::Duration`].
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_timeout_minutes.saturating_mul(60))
    }
}

/// What to do with a response that settles after a newer submission started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Show it anyway: the last response to settle wins the display and the
    /// cache slot.
    #[default]
    Display,
    /// Drop it without touching the display or the cache.
    Discard,
}

/// Search controller settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Handling of responses to superseded submissions.
    pub stale_responses: StalePolicy,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load `path` when it exists, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> crate::error::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::devfinder_dirs::config_file()
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.search.validate()?;
        if self.session.idle_timeout_minutes == 0 {
            return Err(AppError::Config(
                "session.idle_timeout_minutes must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
