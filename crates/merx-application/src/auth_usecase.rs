//! Login, logout and activity use case.

use merx_core::auth::{Authenticator, Credentials, LoginOutcome};
use merx_core::session::{
    ActivitySignal, DomainPolicy, SessionLivenessMonitor, SessionState, UserProfile,
};
use merx_core::{ConsoleError, Result};
use std::sync::Arc;

/// Coordinates the authenticator, the domain policy and the liveness monitor.
///
/// The monitor stays the single writer of session state; this use case only
/// decides when to start and end sessions.
pub struct AuthUseCase {
    monitor: Arc<SessionLivenessMonitor>,
    authenticator: Arc<dyn Authenticator>,
    policy: DomainPolicy,
}

impl AuthUseCase {
    pub fn new(
        monitor: Arc<SessionLivenessMonitor>,
        authenticator: Arc<dyn Authenticator>,
        policy: DomainPolicy,
    ) -> Self {
        Self {
            monitor,
            authenticator,
            policy,
        }
    }

    pub fn monitor(&self) -> &Arc<SessionLivenessMonitor> {
        &self.monitor
    }

    /// Restores a session left by a previous run, if still inside the window.
    pub async fn bootstrap(&self) -> Result<SessionState> {
        self.monitor.bootstrap().await
    }

    /// Username/password login. Not subject to the domain policy.
    pub async fn login_with_credentials(&self, credentials: &Credentials) -> Result<UserProfile> {
        let outcome = self.authenticator.login(credentials).await?;
        self.start(outcome).await
    }

    /// Federated login.
    ///
    /// The asserted email is checked before anything is persisted. On a
    /// violation the monitor is logged out, so no session (the rejected one or
    /// an earlier one) survives, and `DomainRestricted` is returned.
    pub async fn login_federated(&self, id_token: &str) -> Result<UserProfile> {
        let outcome = self.authenticator.login_federated(id_token).await?;

        if let Err(violation) = self.policy.check(outcome.email()) {
            tracing::warn!("[AuthUseCase] Federated login rejected: {}", violation);
            if let Err(e) = self.monitor.logout().await {
                tracing::error!("[AuthUseCase] Logout after rejected login failed: {}", e);
            }
            return Err(violation);
        }
        self.start(outcome).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.monitor.logout().await
    }

    /// Forwards a UI activity signal. Returns whether a write happened.
    pub async fn record_activity(&self, signal: ActivitySignal) -> Result<bool> {
        self.monitor.record_activity(signal).await
    }

    async fn start(&self, outcome: LoginOutcome) -> Result<UserProfile> {
        if outcome.token.trim().is_empty() {
            return Err(ConsoleError::Authentication(
                "authenticator returned an empty token".to_string(),
            ));
        }
        self.monitor
            .start_session(&outcome.token, outcome.profile.as_ref())
            .await?;
        tracing::info!(
            "[AuthUseCase] Signed in{}",
            outcome
                .email()
                .map(|e| format!(" as {}", e))
                .unwrap_or_default()
        );
        Ok(outcome.profile.unwrap_or_default())
    }
}
