//! Model → KnowledgeBase → Document navigation.

use merx_core::Result;
use merx_core::resource::{
    ChildSource, Document, KnowledgeBase, Model, ParentKey, RelationalResolver,
};
use merx_core::session::SessionLivenessMonitor;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBaseNode {
    #[serde(flatten)]
    pub knowledge_base: KnowledgeBase,
    pub documents: Vec<Document>,
}

/// A model with its knowledge bases and their documents.
#[derive(Debug, Clone, Serialize)]
pub struct ModelTree {
    pub model: Model,
    pub knowledge_bases: Vec<KnowledgeBaseNode>,
    /// Cache generation the tree was built from.
    pub generation: u64,
}

/// Resolves the resource hierarchy with one resolver (and one bulk cache) per
/// level.
///
/// `refresh` drops every cached bulk list and bumps the generation so callers
/// holding an older tree can tell it is stale.
pub struct ModelHierarchyUseCase {
    monitor: Arc<SessionLivenessMonitor>,
    models: RelationalResolver<Model>,
    knowledge_bases: RelationalResolver<KnowledgeBase>,
    documents: RelationalResolver<Document>,
    generation: AtomicU64,
}

impl ModelHierarchyUseCase {
    pub fn new(
        monitor: Arc<SessionLivenessMonitor>,
        models: Arc<dyn ChildSource<Model>>,
        knowledge_bases: Arc<dyn ChildSource<KnowledgeBase>>,
        documents: Arc<dyn ChildSource<Document>>,
    ) -> Self {
        Self {
            monitor,
            models: RelationalResolver::new(models),
            knowledge_bases: RelationalResolver::new(knowledge_bases),
            documents: RelationalResolver::new(documents),
            generation: AtomicU64::new(0),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Looks a model up by either of its identifiers.
    pub async fn resolve_model(&self, model_id: &str) -> Result<Option<Model>> {
        self.monitor.ensure_authenticated().await?;
        let mut found = self.models.resolve_children(&ParentKey::id(model_id)).await;
        if found.len() > 1 {
            tracing::debug!(
                "[ModelHierarchy] {} models matched '{}', using the first",
                found.len(),
                model_id
            );
        }
        Ok((!found.is_empty()).then(|| found.swap_remove(0)))
    }

    pub async fn knowledge_bases_for(&self, model: &Model) -> Result<Vec<KnowledgeBase>> {
        self.monitor.ensure_authenticated().await?;
        Ok(self
            .knowledge_bases
            .resolve_children(&ParentKey::from(model))
            .await)
    }

    pub async fn documents_for(&self, knowledge_base: &KnowledgeBase) -> Result<Vec<Document>> {
        self.monitor.ensure_authenticated().await?;
        Ok(self
            .documents
            .resolve_children(&ParentKey::from(knowledge_base))
            .await)
    }

    /// Resolves model, knowledge bases and documents in sequence.
    ///
    /// `Ok(None)` when no model matches `model_id`.
    pub async fn resolve_tree(&self, model_id: &str) -> Result<Option<ModelTree>> {
        let generation = self.generation();
        let Some(model) = self.resolve_model(model_id).await? else {
            return Ok(None);
        };

        let mut knowledge_bases = Vec::new();
        for knowledge_base in self.knowledge_bases_for(&model).await? {
            let documents = self.documents_for(&knowledge_base).await?;
            knowledge_bases.push(KnowledgeBaseNode {
                knowledge_base,
                documents,
            });
        }

        Ok(Some(ModelTree {
            model,
            knowledge_bases,
            generation,
        }))
    }

    /// Every knowledge base, for creation-form pickers.
    ///
    /// Shares the bulk list the resolver falls back to, so opening a picker
    /// after a fallback costs no extra request.
    pub async fn knowledge_base_picker(&self) -> Result<Arc<Vec<KnowledgeBase>>> {
        self.monitor.ensure_authenticated().await?;
        self.knowledge_bases.bulk_list().await
    }

    /// Drops all cached bulk lists. Returns the new generation.
    pub async fn refresh(&self) -> u64 {
        self.models.invalidate().await;
        self.knowledge_bases.invalidate().await;
        self.documents.invalidate().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("[ModelHierarchy] Caches dropped, generation {}", generation);
        generation
    }
}
