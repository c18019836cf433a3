//! Partition collaborator traits.

use super::model::Partition;
use crate::error::Result;
use async_trait::async_trait;

/// Lists the configured partitions.
#[async_trait]
pub trait PartitionDirectory: Send + Sync {
    async fn list_partitions(&self) -> Result<Vec<Partition>>;
}

/// Fetches one kind of resource from a single partition.
///
/// Implementations may fail; the fetcher absorbs per-partition failures.
#[async_trait]
pub trait PartitionSource<T: Send + 'static>: Send + Sync {
    async fn fetch_partition(&self, partition: &Partition) -> Result<Vec<T>>;
}
