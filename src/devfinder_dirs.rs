//! Centralized application directory paths for devfinder.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Environment Overrides
//!
//! - `DEVFINDER_CONFIG_DIR` overrides [`config_dir`]
//! - `DEVFINDER_SESSION_DIR` overrides [`session_root`]

use std::path::PathBuf;

/// Application config directory, holding `config.toml`.
///
/// Resolves to `dirs::config_dir()/devfinder/` by default.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("DEVFINDER_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("devfinder"))
        .unwrap_or_else(|| PathBuf::from("/tmp/devfinder-config"))
}

/// Root directory for session-scoped state; one subdirectory per session.
///
/// Resolves to `dirs::cache_dir()/devfinder/sessions/` by default. Session
/// data is expendable, so it lives under the cache directory.
#[must_use]
pub fn session_root() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("DEVFINDER_SESSION_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::cache_dir()
        .map(|d| d.join("devfinder").join("sessions"))
        .unwrap_or_else(|| PathBuf::from("/tmp/devfinder-sessions"))
}

/// Default config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
