//! Merchant records as listed per cluster.

use crate::partition::PartitionAffinity;
use serde::{Deserialize, Serialize};

/// A merchant row as returned by a cluster's listing endpoint.
///
/// Only identity and affiliation are typed; the remaining fields are kept
/// verbatim for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    #[serde(alias = "merchantId", alias = "merchant_id")]
    pub id: String,
    #[serde(default, alias = "merchantName", alias = "merchant_name")]
    pub name: String,
    #[serde(default, alias = "cluster_id", skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PartitionAffinity for Merchant {
    fn declared_partition(&self) -> Option<&str> {
        self.cluster_id.as_deref().filter(|s| !s.is_empty())
    }
}
