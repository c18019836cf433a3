//! HTTP implementations of the partition and child-source traits.
//!
//! # Endpoints
//!
//! | Trait                         | Scoped                              | Bulk               |
//! |-------------------------------|-------------------------------------|--------------------|
//! | `PartitionDirectory`          | -                                   | `clusters`         |
//! | `PartitionSource<Merchant>`   | `clusters/{id}/merchants`           | -                  |
//! | `ChildSource<Model>`          | `models/{id}`                       | `models`           |
//! | `ChildSource<KnowledgeBase>`  | `models/{id}/knowledge-bases`       | `knowledge-bases`  |
//! | `ChildSource<Document>`       | `knowledge-bases/{id}/documents`    | `documents`        |

use super::client::ApiClient;
use async_trait::async_trait;
use merx_core::Result;
use merx_core::merchant::Merchant;
use merx_core::partition::{Partition, PartitionDirectory, PartitionSource};
use merx_core::payload::ListAdapter;
use merx_core::resource::{ChildSource, Document, KnowledgeBase, Model};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Console backend reached over HTTP.
#[derive(Clone)]
pub struct HttpConsoleBackend {
    client: ApiClient,
    adapter: ListAdapter,
}

impl HttpConsoleBackend {
    pub fn new(client: ApiClient, adapter: ListAdapter) -> Self {
        Self { client, adapter }
    }

    async fn list<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>> {
        let payload = self.client.get_json(segments).await?;
        self.adapter.decode(payload)
    }
}

/// Decodes a single-record endpoint as a list of at most one item.
///
/// Accepts a bare record, a record wrapped in `{"data": {...}}`, or any list
/// shape the adapter knows.
pub(crate) fn decode_single_or_list<T: DeserializeOwned>(
    adapter: &ListAdapter,
    payload: Value,
) -> Result<Vec<T>> {
    if adapter.shape_of(&payload).is_some() {
        return adapter.decode(payload);
    }
    let record = match payload {
        Value::Object(mut map) if !map.contains_key("id") && map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        Value::Null => return Ok(Vec::new()),
        other => other,
    };
    Ok(vec![serde_json::from_value(record)?])
}

#[async_trait]
impl PartitionDirectory for HttpConsoleBackend {
    async fn list_partitions(&self) -> Result<Vec<Partition>> {
        self.list(&["clusters"]).await
    }
}

#[async_trait]
impl PartitionSource<Merchant> for HttpConsoleBackend {
    async fn fetch_partition(&self, partition: &Partition) -> Result<Vec<Merchant>> {
        self.list(&["clusters", partition.id.as_str(), "merchants"]).await
    }
}

#[async_trait]
impl ChildSource<Model> for HttpConsoleBackend {
    async fn fetch_scoped(&self, parent_id: &str) -> Result<Vec<Model>> {
        let payload = self.client.get_json(&["models", parent_id]).await?;
        decode_single_or_list(&self.adapter, payload)
    }

    async fn fetch_bulk(&self) -> Result<Vec<Model>> {
        self.list(&["models"]).await
    }
}

#[async_trait]
impl ChildSource<KnowledgeBase> for HttpConsoleBackend {
    async fn fetch_scoped(&self, parent_id: &str) -> Result<Vec<KnowledgeBase>> {
        self.list(&["models", parent_id, "knowledge-bases"]).await
    }

    async fn fetch_bulk(&self) -> Result<Vec<KnowledgeBase>> {
        self.list(&["knowledge-bases"]).await
    }
}

#[async_trait]
impl ChildSource<Document> for HttpConsoleBackend {
    async fn fetch_scoped(&self, parent_id: &str) -> Result<Vec<Document>> {
        self.list(&["knowledge-bases", parent_id, "documents"]).await
    }

    async fn fetch_bulk(&self) -> Result<Vec<Document>> {
        self.list(&["documents"]).await
    }
}
