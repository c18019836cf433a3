//! Configuration service.
//!
//! Loads `ConsoleConfig` from `config.toml` (see [`ConsolePaths`]) and caches it.

use crate::paths::ConsolePaths;
use crate::storage::AtomicTomlFile;
use merx_core::Result;
use merx_core::config::ConsoleConfig;
use std::sync::{Arc, RwLock};

/// Loads and caches the console configuration.
///
/// A missing file is created with defaults on first access.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: ConsolePaths,
    config: Arc<RwLock<Option<ConsoleConfig>>>,
}

impl ConfigService {
    pub fn new(paths: ConsolePaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn paths(&self) -> &ConsolePaths {
        &self.paths
    }

    /// Returns the configuration, loading it from disk if not cached.
    pub fn get_config(&self) -> Result<ConsoleConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_config(&self) -> Result<ConsoleConfig> {
        let path = self.paths.config_file()?;
        let file = AtomicTomlFile::<ConsoleConfig>::new(path.clone());

        let config = match file.load()? {
            Some(config) => config,
            None => {
                tracing::info!(
                    "[ConfigService] No config at {}, writing defaults",
                    path.display()
                );
                let defaults = ConsoleConfig::default();
                file.save(&defaults)?;
                defaults
            }
        };

        config.validate()?;
        tracing::debug!(
            "[ConfigService] Loaded config: api={}, timeout={}s, interval={}s",
            config.api.base_url,
            config.session.timeout_secs,
            config.session.check_interval_secs
        );
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(ConsolePaths::new())
    }
}
