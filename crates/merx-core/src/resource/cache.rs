//! Per-level memo of the last bulk fetch.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// The last bulk-fetched list for one resource level.
///
/// Advisory only: there is no TTL and entries are replaced wholesale. The
/// slot lock is held across a fill so concurrent resolutions at the same
/// level share one fetch.
pub struct ResolutionCache<C> {
    slot: Mutex<Option<Arc<Vec<C>>>>,
}

impl<C> ResolutionCache<C> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached list, if any.
    pub async fn get(&self) -> Option<Arc<Vec<C>>> {
        self.slot.lock().await.clone()
    }

    /// Locks the slot for a check-then-fill sequence.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, Option<Arc<Vec<C>>>> {
        self.slot.lock().await
    }

    /// Drops the cached list so the next resolution refetches.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

impl<C> Default for ResolutionCache<C> {
    fn default() -> Self {
        Self::new()
    }
}
