//! Wiring of the console services.

use crate::auth_usecase::AuthUseCase;
use crate::merchant_listing::MerchantListingUseCase;
use crate::model_hierarchy::ModelHierarchyUseCase;
use anyhow::{Context, Result};
use merx_core::clock::SystemClock;
use merx_core::config::ConsoleConfig;
use merx_core::payload::ListAdapter;
use merx_core::session::{DomainPolicy, LivenessScheduler, SessionLivenessMonitor};
use merx_infrastructure::http::{ApiClient, HttpAuthenticator, HttpConsoleBackend};
use merx_infrastructure::{ConfigService, ConsolePaths, FileSessionStore};
use std::sync::Arc;

/// All use cases sharing one liveness monitor.
pub struct ConsoleContext {
    pub config: ConsoleConfig,
    pub monitor: Arc<SessionLivenessMonitor>,
    pub auth: AuthUseCase,
    pub merchants: MerchantListingUseCase,
    pub models: ModelHierarchyUseCase,
}

impl ConsoleContext {
    /// Loads configuration from `paths` and wires the HTTP-backed services.
    pub fn from_paths(paths: ConsolePaths) -> Result<Self> {
        let config_service = ConfigService::new(paths.clone());
        let config = config_service
            .get_config()
            .context("Failed to load console configuration")?;
        let session_file = paths
            .session_file()
            .context("Failed to resolve session file path")?;

        let store = Arc::new(FileSessionStore::new(session_file));
        let monitor = Arc::new(SessionLivenessMonitor::new(
            store,
            Arc::new(SystemClock),
            config.session,
        ));

        let client = ApiClient::new(&config.api, monitor.clone())
            .context("Failed to create API client")?;
        let backend = Arc::new(HttpConsoleBackend::new(
            client.clone(),
            ListAdapter::new(config.resolver.list_keys.iter().cloned()),
        ));
        let authenticator = Arc::new(HttpAuthenticator::new(client));

        tracing::debug!("[ConsoleContext] Services wired against {}", config.api.base_url);

        Ok(Self {
            auth: AuthUseCase::new(
                monitor.clone(),
                authenticator,
                DomainPolicy::new(&config.auth.allowed_email_domains),
            ),
            merchants: MerchantListingUseCase::new(monitor.clone(), backend.clone(), backend.clone()),
            models: ModelHierarchyUseCase::new(
                monitor.clone(),
                backend.clone(),
                backend.clone(),
                backend,
            ),
            monitor,
            config,
        })
    }

    /// A scheduler for this context's monitor; spawn it to enforce the window.
    pub fn liveness_scheduler(&self) -> LivenessScheduler {
        LivenessScheduler::new(self.monitor.clone())
    }
}
