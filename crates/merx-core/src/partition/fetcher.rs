//! Fan-out across independent partitions.

use super::model::{AggregationResult, Partition, PartitionAffinity, Tagged};
use super::source::PartitionSource;
use crate::error::Result;
use futures::future::join_all;
use std::future::Future;

/// Queries every partition concurrently and merges the answers.
///
/// All fetches are created in partition order and driven together on the
/// calling task; the fetcher only returns once every one of them has settled.
/// A failing partition is recorded and never interrupts the others.
pub struct PartitionedFetcher;

impl PartitionedFetcher {
    /// Fetches from each partition with `fetch_one`.
    ///
    /// An empty partition list returns an empty result without calling
    /// `fetch_one`. Use [`AggregationResult::into_result`] to turn a fully
    /// failed aggregation into `NoDataAvailable`.
    pub async fn fetch_across_partitions<T, F, Fut>(
        partitions: &[Partition],
        fetch_one: F,
    ) -> AggregationResult<T>
    where
        T: PartitionAffinity,
        F: Fn(Partition) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        if partitions.is_empty() {
            tracing::debug!("[PartitionedFetcher] No partitions, nothing to fetch");
            return AggregationResult::empty();
        }

        let outcomes = join_all(partitions.iter().cloned().map(&fetch_one)).await;

        let mut result = AggregationResult {
            items: Vec::new(),
            failed_partitions: Vec::new(),
            succeeded_count: 0,
            total_count: partitions.len(),
        };

        for (partition, outcome) in partitions.iter().zip(outcomes) {
            match outcome {
                Ok(items) => {
                    tracing::debug!(
                        "[PartitionedFetcher] Partition '{}' returned {} item(s)",
                        partition.id,
                        items.len()
                    );
                    result.succeeded_count += 1;
                    result.items.extend(items.into_iter().map(|item| {
                        let partition_id = item
                            .declared_partition()
                            .map(str::to_string)
                            .unwrap_or_else(|| partition.id.clone());
                        Tagged { item, partition_id }
                    }));
                }
                Err(e) => {
                    tracing::warn!(
                        "[PartitionedFetcher] Partition '{}' failed: {}",
                        partition.id,
                        e
                    );
                    result.failed_partitions.push(partition.id.clone());
                }
            }
        }

        if result.is_unavailable() {
            tracing::error!(
                "[PartitionedFetcher] All {} partition(s) failed",
                result.total_count
            );
        } else {
            tracing::info!(
                "[PartitionedFetcher] {}/{} partition(s) answered, {} item(s)",
                result.succeeded_count,
                result.total_count,
                result.items.len()
            );
        }

        result
    }

    /// Fetches from each partition through a [`PartitionSource`].
    pub async fn fetch_from_source<T>(
        partitions: &[Partition],
        source: &dyn PartitionSource<T>,
    ) -> AggregationResult<T>
    where
        T: PartitionAffinity + Send + 'static,
    {
        Self::fetch_across_partitions(partitions, |partition| async move {
            source.fetch_partition(&partition).await
        })
        .await
    }
}
