//! Child source trait.

use super::matching::ChildNode;
use crate::error::Result;
use async_trait::async_trait;

/// Backend access for one level of the resource hierarchy.
///
/// `fetch_scoped` is the preferred per-parent query; it may not exist on
/// every deployment. `fetch_bulk` lists every record of the level.
#[async_trait]
pub trait ChildSource<C: ChildNode>: Send + Sync {
    async fn fetch_scoped(&self, parent_id: &str) -> Result<Vec<C>>;

    async fn fetch_bulk(&self) -> Result<Vec<C>>;
}
