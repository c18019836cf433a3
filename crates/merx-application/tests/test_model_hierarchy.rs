mod common;

use async_trait::async_trait;
use common::Harness;
use merx_application::ModelHierarchyUseCase;
use merx_core::resource::{ChildNode, ChildSource, Document, KnowledgeBase, Model};
use merx_core::{ConsoleError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One level of a fake backend: scoped answers by parent id plus a bulk list.
struct Level<C> {
    scoped: HashMap<String, Vec<C>>,
    scoped_missing: bool,
    bulk: Vec<C>,
    bulk_calls: AtomicUsize,
}

impl<C> Level<C> {
    fn new(bulk: Vec<C>) -> Self {
        Self {
            scoped: HashMap::new(),
            scoped_missing: false,
            bulk,
            bulk_calls: AtomicUsize::new(0),
        }
    }

    fn scoped(mut self, parent: &str, items: Vec<C>) -> Self {
        self.scoped.insert(parent.to_string(), items);
        self
    }

    fn without_scoped_endpoint(mut self) -> Self {
        self.scoped_missing = true;
        self
    }

    fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<C: ChildNode> ChildSource<C> for Level<C> {
    async fn fetch_scoped(&self, parent_id: &str) -> Result<Vec<C>> {
        if self.scoped_missing {
            return Err(ConsoleError::transport(Some(404), "Not Found"));
        }
        Ok(self.scoped.get(parent_id).cloned().unwrap_or_default())
    }

    async fn fetch_bulk(&self) -> Result<Vec<C>> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.bulk.clone())
    }
}

fn model(id: &str, name: &str, alternate_id: Option<&str>) -> Model {
    Model {
        id: id.into(),
        name: name.into(),
        alternate_id: alternate_id.map(Into::into),
    }
}

fn kb(id: &str, name: &str, model_id: Option<&str>, model_name: Option<&str>) -> KnowledgeBase {
    KnowledgeBase {
        id: id.into(),
        name: name.into(),
        alternate_id: None,
        parent_model_id: model_id.map(Into::into),
        parent_model_name: model_name.map(Into::into),
    }
}

fn doc(id: &str, kb_id: Option<&str>, kb_name: Option<&str>) -> Document {
    Document {
        id: id.into(),
        name: format!("{}.pdf", id),
        parent_knowledge_base_id: kb_id.map(Into::into),
        parent_knowledge_base_name: kb_name.map(Into::into),
    }
}

struct Backend {
    models: Arc<Level<Model>>,
    knowledge_bases: Arc<Level<KnowledgeBase>>,
    documents: Arc<Level<Document>>,
}

impl Backend {
    fn usecase(&self, harness: &Harness) -> ModelHierarchyUseCase {
        ModelHierarchyUseCase::new(
            harness.monitor.clone(),
            self.models.clone(),
            self.knowledge_bases.clone(),
            self.documents.clone(),
        )
    }
}

/// Support Bot (42 / "bot-ext") with two knowledge bases:
/// FAQ links by id; Returns links only by model name. Documents have no
/// scoped endpoint.
fn backend() -> Backend {
    let support = model("42", "Support Bot", Some("bot-ext"));
    Backend {
        models: Arc::new(
            Level::new(vec![support.clone(), model("7", "Sales Bot", None)])
                .without_scoped_endpoint(),
        ),
        knowledge_bases: Arc::new(Level::new(vec![
            kb("kb-1", "FAQ", Some("42"), None),
            kb("kb-2", "Returns", Some("legacy-99"), Some("support bot")),
            kb("kb-3", "Pricing", Some("7"), Some("Sales Bot")),
        ])),
        documents: Arc::new(
            Level::new(vec![
                doc("d1", Some("kb-1"), None),
                doc("d2", None, Some("RETURNS")),
                doc("d3", Some("kb-3"), None),
            ])
            .without_scoped_endpoint(),
        ),
    }
}

#[tokio::test]
async fn test_resolve_tree_joins_by_id_and_name() {
    let harness = Harness::signed_in().await;
    let backend = backend();
    let hierarchy = backend.usecase(&harness);

    let tree = hierarchy.resolve_tree("42").await.unwrap().unwrap();

    assert_eq!(tree.model.name, "Support Bot");
    let kbs: Vec<&str> = tree
        .knowledge_bases
        .iter()
        .map(|n| n.knowledge_base.id.as_str())
        .collect();
    assert_eq!(kbs, vec!["kb-1", "kb-2"]);
    assert_eq!(tree.knowledge_bases[0].documents[0].id, "d1");
    assert_eq!(tree.knowledge_bases[1].documents[0].id, "d2");
    assert_eq!(tree.generation, 0);

    // One bulk fetch per level, shared by every parent at that level.
    assert_eq!(backend.models.bulk_calls(), 1);
    assert_eq!(backend.knowledge_bases.bulk_calls(), 1);
    assert_eq!(backend.documents.bulk_calls(), 1);
}

#[tokio::test]
async fn test_model_found_by_alternate_id() {
    let harness = Harness::signed_in().await;
    let hierarchy = backend().usecase(&harness);

    let found = hierarchy.resolve_model("bot-ext").await.unwrap().unwrap();
    assert_eq!(found.id, "42");

    assert!(hierarchy.resolve_model("missing").await.unwrap().is_none());
    assert!(hierarchy.resolve_tree("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_scoped_answer_wins() {
    let harness = Harness::signed_in().await;
    let mut backend = backend();
    backend.knowledge_bases = Arc::new(
        Level::new(Vec::new()).scoped("42", vec![kb("kb-9", "Scoped", None, None)]),
    );
    let hierarchy = backend.usecase(&harness);

    let support = model("42", "Support Bot", None);
    let kbs = hierarchy.knowledge_bases_for(&support).await.unwrap();

    assert_eq!(kbs.len(), 1);
    assert_eq!(kbs[0].id, "kb-9");
    assert_eq!(backend.knowledge_bases.bulk_calls(), 0);
}

#[tokio::test]
async fn test_picker_shares_fallback_list() {
    let harness = Harness::signed_in().await;
    let backend = backend();
    let hierarchy = backend.usecase(&harness);

    hierarchy
        .knowledge_bases_for(&model("42", "Support Bot", None))
        .await
        .unwrap();
    let picker = hierarchy.knowledge_base_picker().await.unwrap();

    assert_eq!(picker.len(), 3);
    assert_eq!(backend.knowledge_bases.bulk_calls(), 1);
}

#[tokio::test]
async fn test_refresh_bumps_generation_and_refetches() {
    let harness = Harness::signed_in().await;
    let backend = backend();
    let hierarchy = backend.usecase(&harness);

    hierarchy.resolve_tree("42").await.unwrap();
    assert_eq!(hierarchy.refresh().await, 1);
    let tree = hierarchy.resolve_tree("42").await.unwrap().unwrap();

    assert_eq!(tree.generation, 1);
    assert_eq!(hierarchy.generation(), 1);
    assert_eq!(backend.knowledge_bases.bulk_calls(), 2);
}

#[tokio::test]
async fn test_refuses_work_after_expiry() {
    let harness = Harness::signed_in().await;
    let backend = backend();
    let hierarchy = backend.usecase(&harness);

    harness.clock.advance_secs(20 * 60 + 1);

    let err = hierarchy.resolve_tree("42").await.unwrap_err();
    assert!(err.is_session_expired());
    assert!(hierarchy.knowledge_base_picker().await.unwrap_err().is_session_expired());
    assert_eq!(backend.models.bulk_calls(), 0);
}
