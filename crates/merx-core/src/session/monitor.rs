//! Activity-based session liveness monitor.

use super::model::{ActivitySignal, LivenessStatus, SessionSnapshot, SessionState, UserProfile};
use super::store::SessionStore;
use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::error::{ConsoleError, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// In-memory mirror of the persisted session fields.
#[derive(Debug, Default)]
struct LiveSession {
    token: Option<String>,
    last_activity_at: Option<i64>,
}

/// Owns the authentication flag and decides whether the session is still live.
///
/// The monitor is the only writer of the token, activity timestamp and cached
/// profile. It never lets true inactivity keep a session authenticated for
/// longer than `timeout + check_interval`, provided `check_liveness` runs on
/// the configured period (see `LivenessScheduler`).
///
/// # Transitions
///
/// - `bootstrap`: restores or discards a session left by a previous process
/// - `start_session`: Unauthenticated → Authenticated
/// - `check_liveness` / `logout`: Authenticated → Unauthenticated
pub struct SessionLivenessMonitor {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    settings: SessionConfig,
    live: Mutex<LiveSession>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionLivenessMonitor {
    /// Creates a monitor in the Unauthenticated state.
    ///
    /// Call [`bootstrap`](Self::bootstrap) to pick up a persisted session.
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>, settings: SessionConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            store,
            clock,
            settings,
            live: Mutex::new(LiveSession::default()),
            state_tx,
        }
    }

    pub fn settings(&self) -> &SessionConfig {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    fn timeout_millis(&self) -> i64 {
        self.settings.timeout().as_millis() as i64
    }

    fn throttle_millis(&self) -> i64 {
        self.settings.activity_throttle().as_millis() as i64
    }

    fn idle_millis(&self, last_activity_at: Option<i64>) -> i64 {
        // Absent timestamp: session predates activity tracking.
        last_activity_at
            .map(|ts| (self.clock.now_millis() - ts).max(0))
            .unwrap_or(0)
    }

    fn publish(&self, state: SessionState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    /// Restores the persisted session on process start.
    pub async fn bootstrap(&self) -> Result<SessionState> {
        let mut live = self.live.lock().await;

        let Some(token) = self.store.get_token().await? else {
            tracing::debug!("[SessionMonitor] No stored token, starting unauthenticated");
            // A timestamp without a token is debris from an interrupted logout.
            self.store.clear().await?;
            *live = LiveSession::default();
            self.publish(SessionState::Unauthenticated);
            return Ok(SessionState::Unauthenticated);
        };

        let stored_activity = self.store.get_last_activity().await?;
        let idle = self.idle_millis(stored_activity);

        if idle > self.timeout_millis() {
            tracing::info!(
                "[SessionMonitor] Stored session idle for {}s, discarding",
                idle / 1_000
            );
            self.store.clear().await?;
            *live = LiveSession::default();
            self.publish(SessionState::Unauthenticated);
            return Ok(SessionState::Unauthenticated);
        }

        let last_activity_at = match stored_activity {
            Some(ts) => ts,
            None => {
                let now = self.clock.now_millis();
                tracing::info!("[SessionMonitor] Legacy session without activity stamp, initializing");
                self.store.set_last_activity(now).await?;
                now
            }
        };

        *live = LiveSession {
            token: Some(token),
            last_activity_at: Some(last_activity_at),
        };
        self.publish(SessionState::Authenticated);
        tracing::info!("[SessionMonitor] Session restored");
        Ok(SessionState::Authenticated)
    }

    /// Establishes a session from a successful login.
    ///
    /// Stamps activity as now, then persists the token and the optional
    /// profile. If any write fails the store is cleared again, so a later
    /// `bootstrap` cannot resurrect a half-written session.
    pub async fn start_session(&self, token: &str, profile: Option<&UserProfile>) -> Result<()> {
        if token.trim().is_empty() {
            return Err(ConsoleError::Authentication(
                "login returned an empty token".to_string(),
            ));
        }

        let mut live = self.live.lock().await;
        let now = self.clock.now_millis();

        if let Err(e) = self.persist_session(token, now, profile).await {
            tracing::error!("[SessionMonitor] Failed to persist session: {}", e);
            *live = LiveSession::default();
            self.publish(SessionState::Unauthenticated);
            if let Err(clear_err) = self.store.clear().await {
                tracing::error!(
                    "[SessionMonitor] Failed to roll back partial session: {}",
                    clear_err
                );
            }
            return Err(e);
        }

        *live = LiveSession {
            token: Some(token.to_string()),
            last_activity_at: Some(now),
        };
        self.publish(SessionState::Authenticated);
        tracing::info!("[SessionMonitor] Session started");
        Ok(())
    }

    async fn persist_session(
        &self,
        token: &str,
        now: i64,
        profile: Option<&UserProfile>,
    ) -> Result<()> {
        self.store.set_last_activity(now).await?;
        self.store.set_token(token).await?;
        if let Some(profile) = profile {
            self.store.set_profile(profile).await?;
        }
        Ok(())
    }

    /// Records a user interaction.
    ///
    /// Returns `true` when the timestamp was persisted. Non-qualifying signals,
    /// signals while unauthenticated, and signals within the throttle interval
    /// of the previous write are dropped. A signal arriving after the idle
    /// window has already elapsed ends the session instead of extending it.
    pub async fn record_activity(&self, signal: ActivitySignal) -> Result<bool> {
        if !signal.is_qualifying() {
            return Ok(false);
        }

        let mut live = self.live.lock().await;
        if live.token.is_none() || !self.is_authenticated() {
            return Ok(false);
        }

        let idle = self.idle_millis(live.last_activity_at);
        if idle > self.timeout_millis() {
            tracing::info!(
                "[SessionMonitor] Activity after {}s idle (limit {}s), logging out",
                idle / 1_000,
                self.settings.timeout_secs
            );
            self.end_session(&mut live).await?;
            return Ok(false);
        }

        let now = self.clock.now_millis();
        let due = match live.last_activity_at {
            Some(previous) => now - previous > self.throttle_millis(),
            None => true,
        };
        if !due {
            return Ok(false);
        }

        self.store.set_last_activity(now).await?;
        live.last_activity_at = Some(now);
        tracing::trace!("[SessionMonitor] Activity recorded ({})", signal);
        Ok(true)
    }

    /// Recomputes idle time and forces logout when the window is exceeded.
    pub async fn check_liveness(&self) -> Result<LivenessStatus> {
        let mut live = self.live.lock().await;
        if live.token.is_none() || !self.is_authenticated() {
            return Ok(LivenessStatus::Unauthenticated);
        }

        let idle = self.idle_millis(live.last_activity_at);
        if idle > self.timeout_millis() {
            tracing::info!(
                "[SessionMonitor] Idle for {}s (limit {}s), logging out",
                idle / 1_000,
                self.settings.timeout_secs
            );
            self.end_session(&mut live).await?;
            return Ok(LivenessStatus::Expired { idle_millis: idle });
        }

        Ok(LivenessStatus::Alive { idle_millis: idle })
    }

    /// Ends the session. Safe to call any number of times.
    pub async fn logout(&self) -> Result<()> {
        let mut live = self.live.lock().await;
        let was_live = live.token.is_some();
        self.end_session(&mut live).await?;
        if was_live {
            tracing::info!("[SessionMonitor] Logged out");
        }
        Ok(())
    }

    /// Flips to Unauthenticated before clearing the store, so a failing store
    /// never leaves the session usable.
    async fn end_session(&self, live: &mut LiveSession) -> Result<()> {
        *live = LiveSession::default();
        self.publish(SessionState::Unauthenticated);

        if let Err(e) = self.store.clear().await {
            tracing::error!("[SessionMonitor] Failed to clear session store: {}", e);
            return Err(e);
        }
        Ok(())
    }

    /// Returns the bearer token for an authenticated call.
    ///
    /// Runs an on-demand liveness check first, so a session that expired
    /// between two periodic checks is never used.
    pub async fn require_token(&self) -> Result<String> {
        match self.check_liveness().await? {
            LivenessStatus::Alive { .. } => {}
            LivenessStatus::Expired { .. } | LivenessStatus::Unauthenticated => {
                return Err(ConsoleError::SessionExpired);
            }
        }
        self.live
            .lock()
            .await
            .token
            .clone()
            .ok_or(ConsoleError::SessionExpired)
    }

    /// Fails with `SessionExpired` unless the session is currently live.
    pub async fn ensure_authenticated(&self) -> Result<()> {
        self.require_token().await.map(|_| ())
    }

    /// Cached profile of the signed-in operator.
    pub async fn profile(&self) -> Result<Option<UserProfile>> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        self.store.get_profile().await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let live = self.live.lock().await;
        SessionSnapshot {
            state: self.state(),
            has_token: live.token.is_some(),
            last_activity_at: live.last_activity_at,
            idle_millis: live
                .token
                .as_ref()
                .map(|_| self.idle_millis(live.last_activity_at)),
        }
    }
}
