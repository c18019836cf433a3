//! Resource hierarchy models: Model → KnowledgeBase → Document.
//!
//! Records carry only the fields the resolver depends on (identity and
//! parent linkage). Upstream payloads are inconsistent about field names and
//! about whether ids are strings or numbers, so deserialization is tolerant
//! on both counts.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Level of the resource hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceLevel {
    Model,
    KnowledgeBase,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, alias = "modelName", alias = "model_name")]
    pub name: String,
    /// Secondary identifier some endpoints use instead of `id`.
    #[serde(
        default,
        alias = "modelId",
        alias = "model_id",
        alias = "externalId",
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub alternate_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, alias = "knowledgeBaseName", alias = "kbName")]
    pub name: String,
    #[serde(
        default,
        alias = "knowledgeBaseId",
        alias = "kbId",
        alias = "collectionId",
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub alternate_id: Option<String>,
    #[serde(
        default,
        alias = "modelId",
        alias = "model_id",
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_model_id: Option<String>,
    #[serde(
        default,
        alias = "modelName",
        alias = "model_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, alias = "fileName", alias = "title")]
    pub name: String,
    #[serde(
        default,
        alias = "knowledgeBaseId",
        alias = "knowledge_base_id",
        alias = "kbId",
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_knowledge_base_id: Option<String>,
    #[serde(
        default,
        alias = "knowledgeBaseName",
        alias = "knowledge_base_name",
        alias = "kbName",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_knowledge_base_name: Option<String>,
}

/// Any node of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceNode {
    Model(Model),
    KnowledgeBase(KnowledgeBase),
    Document(Document),
}

impl ResourceNode {
    pub fn level(&self) -> ResourceLevel {
        match self {
            Self::Model(_) => ResourceLevel::Model,
            Self::KnowledgeBase(_) => ResourceLevel::KnowledgeBase,
            Self::Document(_) => ResourceLevel::Document,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Model(m) => &m.id,
            Self::KnowledgeBase(kb) => &kb.id,
            Self::Document(d) => &d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Model(m) => &m.name,
            Self::KnowledgeBase(kb) => &kb.name,
            Self::Document(d) => &d.name,
        }
    }
}

impl From<Model> for ResourceNode {
    fn from(m: Model) -> Self {
        Self::Model(m)
    }
}

impl From<KnowledgeBase> for ResourceNode {
    fn from(kb: KnowledgeBase) -> Self {
        Self::KnowledgeBase(kb)
    }
}

impl From<Document> for ResourceNode {
    fn from(d: Document) -> Self {
        Self::Document(d)
    }
}

/// The identifying keys of a parent, as seen by its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentKey {
    pub id: String,
    pub alternate_id: Option<String>,
    pub name: Option<String>,
}

impl ParentKey {
    /// A bare id lookup (e.g. a model id taken from the route).
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alternate_id: None,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }
}

impl From<&Model> for ParentKey {
    fn from(m: &Model) -> Self {
        Self {
            id: m.id.clone(),
            alternate_id: m.alternate_id.clone(),
            name: (!m.name.is_empty()).then(|| m.name.clone()),
        }
    }
}

impl From<&KnowledgeBase> for ParentKey {
    fn from(kb: &KnowledgeBase) -> Self {
        Self {
            id: kb.id.clone(),
            alternate_id: kb.alternate_id.clone(),
            name: (!kb.name.is_empty()).then(|| kb.name.clone()),
        }
    }
}

fn value_to_id(value: serde_json::Value) -> Option<std::result::Result<String, String>> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(Ok(s)),
        serde_json::Value::Number(n) => Some(Ok(n.to_string())),
        other => Some(Err(format!("expected string or number id, got {}", other))),
    }
}

fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value_to_id(value) {
        Some(Ok(id)) => Ok(id),
        Some(Err(msg)) => Err(serde::de::Error::custom(msg)),
        None => Err(serde::de::Error::custom("id must not be null")),
    }
}

fn opt_id_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    value_to_id(value)
        .transpose()
        .map_err(serde::de::Error::custom)
}
