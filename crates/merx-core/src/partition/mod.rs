//! Partitioned (multi-cluster) fetching.

mod fetcher;
mod model;
mod source;

pub use fetcher::PartitionedFetcher;
pub use model::{AggregationResult, AggregationStatus, Partition, PartitionAffinity, Tagged};
pub use source::{PartitionDirectory, PartitionSource};
