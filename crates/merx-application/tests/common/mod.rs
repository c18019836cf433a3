#![allow(dead_code)]

use merx_core::clock::ManualClock;
use merx_core::config::SessionConfig;
use merx_core::session::{MemorySessionStore, SessionLivenessMonitor};
use std::sync::Arc;

pub const T0: i64 = 1_700_000_000_000;

pub struct Harness {
    pub store: Arc<MemorySessionStore>,
    pub clock: Arc<ManualClock>,
    pub monitor: Arc<SessionLivenessMonitor>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemorySessionStore::new());
        let clock = Arc::new(ManualClock::new(T0));
        let monitor = Arc::new(SessionLivenessMonitor::new(
            store.clone(),
            clock.clone(),
            SessionConfig::default(),
        ));
        Self {
            store,
            clock,
            monitor,
        }
    }

    /// A harness with a live session.
    pub async fn signed_in() -> Self {
        let harness = Self::new();
        harness
            .monitor
            .start_session("tok", None)
            .await
            .expect("session should start");
        harness
    }
}
