//! Unified path management for merx configuration and session files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/merx/              # Config directory ($MERX_CONFIG_DIR overrides)
//! ├── config.toml              # Console configuration
//! └── session.toml             # Token, activity stamp and cached profile (0600)
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "MERX_CONFIG_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for merx_core::ConsoleError {
    fn from(err: PathError) -> Self {
        merx_core::ConsoleError::config(err.to_string())
    }
}

/// Path resolution for merx, rooted at an optional explicit directory.
#[derive(Debug, Clone, Default)]
pub struct ConsolePaths {
    base: Option<PathBuf>,
}

impl ConsolePaths {
    /// Resolves paths under the platform config dir, or `$MERX_CONFIG_DIR`.
    pub fn new() -> Self {
        Self {
            base: std::env::var_os(CONFIG_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Resolves paths under an explicit directory (tests, `--config-dir`).
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("merx"))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Session file. Holds a bearer token, so it is written with mode 600.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.toml"))
    }
}
