//! Scoped-then-bulk child resolution.

use super::cache::ResolutionCache;
use super::matching::ChildNode;
use super::model::{ParentKey, ResourceLevel};
use super::source::ChildSource;
use crate::error::Result;
use std::sync::Arc;

/// Resolves the children of a parent at one level of the hierarchy.
///
/// # Algorithm
///
/// 1. Try the scoped query for the parent. Errors are logged and treated as
///    "no result".
/// 2. A non-empty scoped answer is authoritative and returned as is.
/// 3. Otherwise the level's bulk list is taken from the cache, or fetched
///    once and cached, and filtered with the match predicate.
///
/// Resolution never fails: if both queries fail the result is empty, which
/// callers present as "nothing found".
pub struct RelationalResolver<C: ChildNode> {
    source: Arc<dyn ChildSource<C>>,
    cache: ResolutionCache<C>,
}

impl<C: ChildNode> RelationalResolver<C> {
    pub fn new(source: Arc<dyn ChildSource<C>>) -> Self {
        Self {
            source,
            cache: ResolutionCache::new(),
        }
    }

    pub fn level(&self) -> ResourceLevel {
        C::LEVEL
    }

    /// Resolves children using the level's default match rule.
    pub async fn resolve_children(&self, parent: &ParentKey) -> Vec<C> {
        self.resolve_children_with(parent, C::matches_parent).await
    }

    /// Resolves children, filtering the bulk fallback with `predicate`.
    pub async fn resolve_children_with<P>(&self, parent: &ParentKey, predicate: P) -> Vec<C>
    where
        P: Fn(&C, &ParentKey) -> bool,
    {
        match self.source.fetch_scoped(&parent.id).await {
            Ok(items) if !items.is_empty() => {
                tracing::debug!(
                    "[Resolver:{}] Scoped lookup for '{}' returned {} item(s)",
                    C::LEVEL,
                    parent.id,
                    items.len()
                );
                return items;
            }
            Ok(_) => {
                tracing::debug!(
                    "[Resolver:{}] Scoped lookup for '{}' empty, falling back to bulk",
                    C::LEVEL,
                    parent.id
                );
            }
            Err(e) if e.is_not_found_or_missing() => {
                tracing::debug!(
                    "[Resolver:{}] Scoped lookup unavailable for '{}': {}",
                    C::LEVEL,
                    parent.id,
                    e
                );
            }
            Err(e) => {
                tracing::warn!(
                    "[Resolver:{}] Scoped lookup for '{}' failed: {}",
                    C::LEVEL,
                    parent.id,
                    e
                );
            }
        }

        let all = match self.bulk_list().await {
            Ok(all) => all,
            Err(e) => {
                tracing::warn!(
                    "[Resolver:{}] Bulk fallback for '{}' failed, returning nothing: {}",
                    C::LEVEL,
                    parent.id,
                    e
                );
                return Vec::new();
            }
        };

        let matched: Vec<C> = all
            .iter()
            .filter(|&child| predicate(child, parent))
            .cloned()
            .collect();
        tracing::debug!(
            "[Resolver:{}] {} of {} bulk item(s) matched '{}'",
            C::LEVEL,
            matched.len(),
            all.len(),
            parent.id
        );
        matched
    }

    /// The level's full list, fetched at most once until invalidated.
    ///
    /// Shared with sibling consumers such as creation-form pickers. A failed
    /// fetch is not cached.
    pub async fn bulk_list(&self) -> Result<Arc<Vec<C>>> {
        let mut slot = self.cache.lock().await;
        if let Some(cached) = slot.as_ref() {
            return Ok(cached.clone());
        }

        tracing::debug!("[Resolver:{}] Fetching bulk list", C::LEVEL);
        let items = Arc::new(self.source.fetch_bulk().await?);
        *slot = Some(items.clone());
        Ok(items)
    }

    /// The cached bulk list without fetching.
    pub async fn cached_bulk(&self) -> Option<Arc<Vec<C>>> {
        self.cache.get().await
    }

    /// Forgets the cached bulk list; the next fallback refetches.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}
