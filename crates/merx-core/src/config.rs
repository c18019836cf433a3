//! Console configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section has
//! defaults so a missing or partial file still yields a usable configuration.

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl ConsoleConfig {
    /// Rejects values that would make the liveness guarantees meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.session.timeout_secs == 0 {
            return Err(ConsoleError::config("session.timeout_secs must be > 0"));
        }
        if self.session.check_interval_secs == 0 {
            return Err(ConsoleError::config(
                "session.check_interval_secs must be > 0",
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConsoleError::config("api.base_url must not be empty"));
        }
        if self.resolver.list_keys.is_empty() {
            return Err(ConsoleError::config("resolver.list_keys must not be empty"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Transport-level deadline. `None` leaves requests unbounded.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

/// Liveness window settings.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_activity_throttle_secs")]
    pub activity_throttle_secs: u64,
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn activity_throttle(&self) -> Duration {
        Duration::from_secs(self.activity_throttle_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            check_interval_secs: default_check_interval_secs(),
            activity_throttle_secs: default_activity_throttle_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    20 * 60
}

fn default_check_interval_secs() -> u64 {
    60
}

fn default_activity_throttle_secs() -> u64 {
    60
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// Domains accepted for federated logins. Empty means no restriction.
    #[serde(default)]
    pub allowed_email_domains: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Object keys tried, in order, when a list payload is not a bare array.
    #[serde(default = "default_list_keys")]
    pub list_keys: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            list_keys: default_list_keys(),
        }
    }
}

fn default_list_keys() -> Vec<String> {
    vec!["models".into(), "content".into(), "data".into()]
}
