//! Partition and aggregation models.

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};

/// An independently addressable backend deployment ("cluster").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    #[serde(alias = "clusterId", alias = "cluster_id")]
    pub id: String,
    #[serde(default, alias = "name", alias = "clusterName")]
    pub label: String,
}

impl Partition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Items that may already know which partition they belong to.
///
/// When an item declares an affiliation, aggregation keeps it instead of
/// tagging the item with the partition that returned it.
pub trait PartitionAffinity {
    fn declared_partition(&self) -> Option<&str> {
        None
    }
}

impl PartitionAffinity for serde_json::Value {
    fn declared_partition(&self) -> Option<&str> {
        ["partition", "clusterId", "cluster_id", "cluster"]
            .iter()
            .find_map(|key| self.get(*key).and_then(|v| v.as_str()))
            .filter(|s| !s.is_empty())
    }
}

/// An item tagged with the partition it is affiliated with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tagged<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(rename = "partition")]
    pub partition_id: String,
}

/// Overall outcome of a fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationStatus {
    /// Every partition answered (also the case for zero partitions).
    Complete,
    /// Some partitions answered, some failed.
    Partial,
    /// At least one partition was queried and none answered.
    Unavailable,
}

/// Order-preserving union of per-partition results plus a failure summary.
///
/// `succeeded_count + failed_partitions.len() == total_count` always holds.
/// Items follow partition order, then each partition's own response order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult<T> {
    pub items: Vec<Tagged<T>>,
    /// Failed partition ids, in partition order.
    pub failed_partitions: Vec<String>,
    pub succeeded_count: usize,
    pub total_count: usize,
}

impl<T> AggregationResult<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            failed_partitions: Vec::new(),
            succeeded_count: 0,
            total_count: 0,
        }
    }

    pub fn status(&self) -> AggregationStatus {
        if self.failed_partitions.is_empty() {
            AggregationStatus::Complete
        } else if self.succeeded_count == 0 {
            AggregationStatus::Unavailable
        } else {
            AggregationStatus::Partial
        }
    }

    /// True when no partition could be reached.
    pub fn is_unavailable(&self) -> bool {
        self.status() == AggregationStatus::Unavailable
    }

    pub fn is_partial(&self) -> bool {
        self.status() == AggregationStatus::Partial
    }

    /// True when reachable partitions legitimately returned nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.is_unavailable()
    }

    pub fn has_failed(&self, partition_id: &str) -> bool {
        self.failed_partitions.iter().any(|id| id == partition_id)
    }

    /// Converts a fully failed aggregation into `NoDataAvailable`.
    pub fn into_result(self) -> Result<Self> {
        if self.is_unavailable() {
            return Err(ConsoleError::NoDataAvailable {
                failed: self.failed_partitions,
            });
        }
        Ok(self)
    }
}
