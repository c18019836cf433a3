//! Parent/child matching rules.
//!
//! Upstream records link to their parent inconsistently: sometimes by the
//! parent's primary id, sometimes by its alternate id, sometimes only by the
//! parent's name. A child matches when any of the three agree.
//!
//! TODO: drop the name-based branch once the backend exposes one identifier
//! scheme for models and knowledge bases.

use super::model::{Document, KnowledgeBase, Model, ParentKey, ResourceLevel};

/// A child's view of its parent link.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentLink<'a> {
    pub id: Option<&'a str>,
    pub name: Option<&'a str>,
}

/// A record the relational resolver can resolve and filter.
pub trait ChildNode: Clone + Send + Sync + 'static {
    const LEVEL: ResourceLevel;

    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn parent_link(&self) -> ParentLink<'_>;

    /// Default tri-condition join against `parent`.
    fn matches_parent(&self, parent: &ParentKey) -> bool {
        links_to(self.parent_link(), parent)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// True when `link` points at `parent` by id, by alternate id, or by
/// case-insensitive name.
pub fn links_to(link: ParentLink<'_>, parent: &ParentKey) -> bool {
    if let Some(id) = non_empty(link.id) {
        if id == parent.id || non_empty(parent.alternate_id.as_deref()) == Some(id) {
            return true;
        }
    }
    match (non_empty(link.name), non_empty(parent.name.as_deref())) {
        (Some(child), Some(parent)) => same_name(child, parent),
        _ => false,
    }
}

impl ChildNode for Model {
    const LEVEL: ResourceLevel = ResourceLevel::Model;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// A model has no parent; at this level the lookup key names the model
    /// itself.
    fn parent_link(&self) -> ParentLink<'_> {
        ParentLink {
            id: Some(&self.id),
            name: Some(&self.name),
        }
    }

    fn matches_parent(&self, key: &ParentKey) -> bool {
        if links_to(self.parent_link(), key) {
            return true;
        }
        // The key may carry either of the model's identifiers.
        match non_empty(self.alternate_id.as_deref()) {
            Some(alt) => alt == key.id || non_empty(key.alternate_id.as_deref()) == Some(alt),
            None => false,
        }
    }
}

impl ChildNode for KnowledgeBase {
    const LEVEL: ResourceLevel = ResourceLevel::KnowledgeBase;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_link(&self) -> ParentLink<'_> {
        ParentLink {
            id: self.parent_model_id.as_deref(),
            name: self.parent_model_name.as_deref(),
        }
    }
}

impl ChildNode for Document {
    const LEVEL: ResourceLevel = ResourceLevel::Document;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_link(&self) -> ParentLink<'_> {
        ParentLink {
            id: self.parent_knowledge_base_id.as_deref(),
            name: self.parent_knowledge_base_name.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb(parent_id: Option<&str>, parent_name: Option<&str>) -> KnowledgeBase {
        KnowledgeBase {
            id: "kb".into(),
            name: "KB".into(),
            alternate_id: None,
            parent_model_id: parent_id.map(Into::into),
            parent_model_name: parent_name.map(Into::into),
        }
    }

    fn model_key() -> ParentKey {
        ParentKey {
            id: "42".into(),
            alternate_id: Some("bot-ext".into()),
            name: Some("Support Bot".into()),
        }
    }

    #[test]
    fn test_matches_by_primary_id() {
        assert!(kb(Some("42"), None).matches_parent(&model_key()));
    }

    #[test]
    fn test_matches_by_alternate_id() {
        assert!(kb(Some("bot-ext"), None).matches_parent(&model_key()));
    }

    #[test]
    fn test_matches_by_name_case_insensitive_despite_id_mismatch() {
        assert!(kb(Some("999"), Some("SUPPORT bot")).matches_parent(&model_key()));
    }

    #[test]
    fn test_no_match() {
        assert!(!kb(Some("7"), Some("Sales Bot")).matches_parent(&model_key()));
        assert!(!kb(None, None).matches_parent(&model_key()));
    }

    #[test]
    fn test_empty_fields_never_match() {
        let key = ParentKey {
            id: "".into(),
            alternate_id: Some("".into()),
            name: Some("".into()),
        };
        assert!(!kb(Some(""), Some("")).matches_parent(&key));
    }

    #[test]
    fn test_document_links_to_knowledge_base() {
        let doc = Document {
            id: "d".into(),
            name: "faq.md".into(),
            parent_knowledge_base_id: None,
            parent_knowledge_base_name: Some("faq".into()),
        };
        let parent = ParentKey::id("kb-1").with_name("FAQ");
        assert!(doc.matches_parent(&parent));
    }

    #[test]
    fn test_model_level_matches_own_identifiers() {
        let model = Model {
            id: "42".into(),
            name: "Support Bot".into(),
            alternate_id: Some("bot-ext".into()),
        };
        assert!(model.matches_parent(&ParentKey::id("42")));
        assert!(model.matches_parent(&ParentKey::id("bot-ext")));
        assert!(model.matches_parent(&ParentKey::id("nope").with_name("support BOT")));
        assert!(!model.matches_parent(&ParentKey::id("43")));
    }
}
