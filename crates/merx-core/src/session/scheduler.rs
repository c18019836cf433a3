//! Periodic liveness checks.

use super::model::{LivenessStatus, SessionState};
use super::monitor::SessionLivenessMonitor;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Runs `check_liveness` on a fixed period while the session is authenticated.
///
/// The loop ends when the session expires, when it is logged out by someone
/// else, or when the cancellation token fires.
pub struct LivenessScheduler {
    monitor: Arc<SessionLivenessMonitor>,
    period: Duration,
    cancel: CancellationToken,
}

impl LivenessScheduler {
    /// Creates a scheduler using the monitor's configured check interval.
    pub fn new(monitor: Arc<SessionLivenessMonitor>) -> Self {
        let period = monitor.settings().check_interval();
        Self {
            monitor,
            period,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the loop when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawns the check loop onto the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs the check loop until it ends.
    pub async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so checks start
        // one period from now.
        ticker.tick().await;

        let mut state_rx = self.monitor.subscribe();
        tracing::info!(target: "liveness", "Scheduler started ({}s interval)", self.period.as_secs());

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!(target: "liveness", "Scheduler cancelled");
                    break;
                }
                changed = state_rx.changed() => {
                    if changed.is_err() || *state_rx.borrow_and_update() == SessionState::Unauthenticated {
                        tracing::debug!(target: "liveness", "Session ended, scheduler stopping");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match self.monitor.check_liveness().await {
                        Ok(LivenessStatus::Alive { idle_millis }) => {
                            tracing::debug!(target: "liveness", "Tick - idle {}s", idle_millis / 1_000);
                        }
                        Ok(LivenessStatus::Expired { .. }) | Ok(LivenessStatus::Unauthenticated) => {
                            tracing::info!(target: "liveness", "Session no longer live, scheduler stopping");
                            break;
                        }
                        Err(e) => {
                            // The monitor has already flipped state; keep ticking
                            // so a transient store failure does not stop checks.
                            tracing::error!(target: "liveness", "Liveness check failed: {}", e);
                        }
                    }
                }
            }
        }
    }
}
