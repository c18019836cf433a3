//! Response-shape adapter for list endpoints.
//!
//! List endpoints answer with a bare array, or with an object holding the
//! array under one of a handful of keys (`{"models": [...]}`,
//! `{"content": [...]}`, `{"data": [...]}`, `{"data": {"content": [...]}}`).

use crate::error::{ConsoleError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const DEFAULT_LIST_KEYS: &[&str] = &["models", "content", "data"];

/// Which shape a payload was recognised as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListShape {
    BareArray,
    Keyed(String),
    /// `{key: {content: [...]}}`
    NestedContent(String),
}

/// Normalises list payloads into a `Vec`.
#[derive(Debug, Clone)]
pub struct ListAdapter {
    keys: Vec<String>,
}

impl ListAdapter {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Finds the list inside `payload` and reports the shape it matched.
    pub fn shape_of(&self, payload: &Value) -> Option<ListShape> {
        match payload {
            Value::Array(_) => Some(ListShape::BareArray),
            Value::Object(map) => self.keys.iter().find_map(|key| match map.get(key) {
                Some(Value::Array(_)) => Some(ListShape::Keyed(key.clone())),
                Some(Value::Object(inner)) if matches!(inner.get("content"), Some(Value::Array(_))) => {
                    Some(ListShape::NestedContent(key.clone()))
                }
                _ => None,
            }),
            _ => None,
        }
    }

    /// Extracts the raw list items.
    ///
    /// Fails with `UnrecognizedShape` rather than returning an empty list, so
    /// a changed backend contract is visible instead of looking like "no data".
    pub fn extract(&self, payload: Value) -> Result<Vec<Value>> {
        let shape = self.shape_of(&payload).ok_or_else(|| ConsoleError::UnrecognizedShape {
            expected: self.keys.clone(),
        })?;
        tracing::debug!("[ListAdapter] Payload shape: {:?}", shape);

        let list = match (shape, payload) {
            (ListShape::BareArray, Value::Array(items)) => Some(items),
            (ListShape::Keyed(key), Value::Object(mut map)) => match map.remove(&key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            },
            (ListShape::NestedContent(key), Value::Object(mut map)) => match map.remove(&key) {
                Some(Value::Object(mut inner)) => match inner.remove("content") {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        };

        list.ok_or_else(|| ConsoleError::internal("list shape changed during extraction"))
    }

    /// Extracts the list and deserializes each item as `T`.
    pub fn decode<T: DeserializeOwned>(&self, payload: Value) -> Result<Vec<T>> {
        self.extract(payload)?
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(ConsoleError::from))
            .collect()
    }
}

impl Default for ListAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_KEYS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_shapes() {
        let adapter = ListAdapter::default();

        assert_eq!(adapter.extract(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(adapter.extract(json!({"models": [1]})).unwrap().len(), 1);
        assert_eq!(adapter.extract(json!({"content": [1, 2, 3]})).unwrap().len(), 3);
        assert_eq!(adapter.extract(json!({"data": []})).unwrap().len(), 0);
        assert_eq!(
            adapter.extract(json!({"data": {"content": [1], "total": 1}})).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_key_order_decides() {
        let adapter = ListAdapter::default();
        let payload = json!({"data": [1, 2], "models": [1]});
        assert_eq!(
            adapter.shape_of(&payload),
            Some(ListShape::Keyed("models".to_string()))
        );
    }

    #[test]
    fn test_unknown_shape_is_loud() {
        let adapter = ListAdapter::default();
        let err = adapter.extract(json!({"items": [1]})).unwrap_err();
        match err {
            ConsoleError::UnrecognizedShape { expected } => {
                assert_eq!(expected, vec!["models", "content", "data"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(adapter.extract(json!("nope")).is_err());
        assert!(adapter.extract(json!({"data": {"rows": []}})).is_err());
    }

    #[test]
    fn test_custom_keys() {
        let adapter = ListAdapter::new(["items"]);
        assert_eq!(adapter.extract(json!({"items": [1]})).unwrap().len(), 1);
        assert!(adapter.extract(json!({"models": [1]})).is_err());
    }

    #[test]
    fn test_decode_items() {
        #[derive(Debug, serde::Deserialize)]
        struct Row {
            id: String,
        }
        let rows: Vec<Row> = ListAdapter::default()
            .decode(json!({"content": [{"id": "a"}, {"id": "b"}]}))
            .unwrap();
        assert_eq!(rows[1].id, "b");

        let err = ListAdapter::default()
            .decode::<Row>(json!([{"name": "no id"}]))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Serialization { .. }));
    }
}
