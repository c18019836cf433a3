//! Session store trait.
//!
//! Defines the key-value persistence the liveness monitor writes through.

use super::model::UserProfile;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Persistent store for the authentication token, activity timestamp and
/// cached profile.
///
/// Only `SessionLivenessMonitor` writes through this trait; every other
/// component goes through the monitor for reads. Implementations must keep
/// the three keys independent so that `clear` can wipe them in one call.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored bearer token, if any.
    async fn get_token(&self) -> Result<Option<String>>;

    async fn set_token(&self, token: &str) -> Result<()>;

    /// Returns the last activity timestamp in epoch milliseconds.
    ///
    /// An unparseable stored value is reported as `None`.
    async fn get_last_activity(&self) -> Result<Option<i64>>;

    async fn set_last_activity(&self, epoch_millis: i64) -> Result<()>;

    async fn get_profile(&self) -> Result<Option<UserProfile>>;

    async fn set_profile(&self, profile: &UserProfile) -> Result<()>;

    /// Removes token, activity timestamp and profile.
    async fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
struct StoredSession {
    token: Option<String>,
    last_activity_at: Option<String>,
    profile: Option<UserProfile>,
}

/// In-process session store.
///
/// Values are kept as the persistent store would keep them (the timestamp as
/// a string). Activity writes are counted so throttling can be observed.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoredSession>,
    activity_writes: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store as if a previous process had left a session behind.
    pub fn with_session(token: impl Into<String>, last_activity_at: Option<i64>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            inner.token = Some(token.into());
            inner.last_activity_at = last_activity_at.map(|ts| ts.to_string());
        }
        store
    }

    /// Number of `set_last_activity` calls since creation.
    pub fn activity_writes(&self) -> usize {
        self.activity_writes.load(Ordering::SeqCst)
    }

    /// Raw stored timestamp string, as a persistent store would hold it.
    pub fn raw_last_activity(&self) -> Option<String> {
        self.lock().last_activity_at.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoredSession> {
        // A poisoned lock only means a panicking test; the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.lock().token.clone())
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        self.lock().token = Some(token.to_string());
        Ok(())
    }

    async fn get_last_activity(&self) -> Result<Option<i64>> {
        Ok(self
            .lock()
            .last_activity_at
            .as_deref()
            .and_then(|raw| raw.parse().ok()))
    }

    async fn set_last_activity(&self, epoch_millis: i64) -> Result<()> {
        self.lock().last_activity_at = Some(epoch_millis.to_string());
        self.activity_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.lock().profile.clone())
    }

    async fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        self.lock().profile = Some(profile.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.lock() = StoredSession::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip_and_clear() {
        let store = MemorySessionStore::new();
        store.set_token("tok").await.unwrap();
        store.set_last_activity(42).await.unwrap();
        store
            .set_profile(&UserProfile::with_email("a@example.com"))
            .await
            .unwrap();

        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("tok"));
        assert_eq!(store.get_last_activity().await.unwrap(), Some(42));
        assert_eq!(store.raw_last_activity().as_deref(), Some("42"));
        assert_eq!(store.activity_writes(), 1);

        store.clear().await.unwrap();
        assert!(store.get_token().await.unwrap().is_none());
        assert!(store.get_last_activity().await.unwrap().is_none());
        assert!(store.get_profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seeded_legacy_session_has_no_timestamp() {
        let store = MemorySessionStore::with_session("legacy", None);
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("legacy"));
        assert!(store.get_last_activity().await.unwrap().is_none());
    }
}
