//! Cross-cluster merchant listing.

use merx_core::merchant::Merchant;
use merx_core::partition::{
    AggregationResult, Partition, PartitionDirectory, PartitionSource, PartitionedFetcher,
};
use merx_core::session::SessionLivenessMonitor;
use merx_core::{ConsoleError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Merchants from every reachable cluster.
#[derive(Debug, Clone)]
pub struct MerchantListing {
    pub result: AggregationResult<Merchant>,
}

impl MerchantListing {
    /// Some clusters failed; the caller should show a non-fatal notice.
    pub fn is_partial(&self) -> bool {
        self.result.is_partial()
    }

    pub fn failed_partitions(&self) -> &[String] {
        &self.result.failed_partitions
    }
}

pub struct MerchantListingUseCase {
    monitor: Arc<SessionLivenessMonitor>,
    directory: Arc<dyn PartitionDirectory>,
    source: Arc<dyn PartitionSource<Merchant>>,
    partitions: OnceCell<Vec<Partition>>,
}

impl MerchantListingUseCase {
    pub fn new(
        monitor: Arc<SessionLivenessMonitor>,
        directory: Arc<dyn PartitionDirectory>,
        source: Arc<dyn PartitionSource<Merchant>>,
    ) -> Self {
        Self {
            monitor,
            directory,
            source,
            partitions: OnceCell::new(),
        }
    }

    /// The partition set, listed once per use case instance.
    ///
    /// A failed listing is not memoised.
    pub async fn list_partitions(&self) -> Result<&[Partition]> {
        self.monitor.ensure_authenticated().await?;
        let partitions = self
            .partitions
            .get_or_try_init(|| async {
                let partitions = self.directory.list_partitions().await?;
                tracing::info!("[MerchantListing] {} cluster(s) configured", partitions.len());
                Ok::<_, ConsoleError>(partitions)
            })
            .await?;
        Ok(partitions.as_slice())
    }

    /// Fans out across every partition.
    ///
    /// Fails with `NoDataAvailable` when no partition is configured or none
    /// answered; a partial failure is reported through the listing.
    pub async fn list_merchants(&self) -> Result<MerchantListing> {
        let partitions = self.list_partitions().await?;
        if partitions.is_empty() {
            return Err(ConsoleError::NoDataAvailable { failed: Vec::new() });
        }

        let result =
            PartitionedFetcher::fetch_from_source(partitions, self.source.as_ref()).await;
        let result = result.into_result()?;

        if result.is_partial() {
            tracing::warn!(
                "[MerchantListing] Partial listing, unreachable: {}",
                result.failed_partitions.join(", ")
            );
        }
        Ok(MerchantListing { result })
    }
}
