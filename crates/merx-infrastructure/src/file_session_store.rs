//! File-backed `SessionStore`.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use merx_core::session::{SessionStore, UserProfile};
use merx_core::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// On-disk layout of `session.toml`.
///
/// The timestamp is kept as a decimal string and the profile as a JSON
/// string, matching what earlier console builds left behind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_activity_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_profile: Option<String>,
}

/// Persists the session in a single TOML file with mode 600.
///
/// Each call is one locked read-modify-write on a blocking thread; the
/// monitor serialises its own writes, so there is no in-memory cache here.
#[derive(Clone)]
pub struct FileSessionStore {
    file: Arc<AtomicTomlFile<SessionDocument>>,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path).with_mode(0o600)),
        }
    }

    async fn read(&self) -> Result<SessionDocument> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| ConsoleError::internal(format!("session read task failed: {}", e)))??;
        Ok(loaded.unwrap_or_default())
    }

    async fn modify<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SessionDocument) + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.update(SessionDocument::default(), f))
            .await
            .map_err(|e| ConsoleError::internal(format!("session write task failed: {}", e)))??;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.read().await?.auth_token.filter(|t| !t.is_empty()))
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        let token = token.to_string();
        self.modify(move |doc| doc.auth_token = Some(token)).await
    }

    async fn get_last_activity(&self) -> Result<Option<i64>> {
        let raw = self.read().await?.last_activity_at;
        Ok(raw.and_then(|s| match s.trim().parse::<i64>() {
            Ok(ts) => Some(ts),
            Err(_) => {
                tracing::warn!("[FileSessionStore] Ignoring unparseable last_activity_at '{}'", s);
                None
            }
        }))
    }

    async fn set_last_activity(&self, epoch_millis: i64) -> Result<()> {
        self.modify(move |doc| doc.last_activity_at = Some(epoch_millis.to_string()))
            .await
    }

    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        let raw = self.read().await?.user_profile;
        Ok(raw.and_then(|json| match serde_json::from_str(&json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("[FileSessionStore] Ignoring unreadable user_profile: {}", e);
                None
            }
        }))
    }

    async fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        self.modify(move |doc| doc.user_profile = Some(json)).await
    }

    async fn clear(&self) -> Result<()> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.remove())
            .await
            .map_err(|e| ConsoleError::internal(format!("session clear task failed: {}", e)))??;
        Ok(())
    }
}
