//! In-memory document model
//!
//! A [`Document`] maps collection keys to ordered item lists. Items are kept
//! as open JSON objects: the only field the store interprets is `id`, every
//! other field round-trips untouched and in its original order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collection::Collection;

/// Field that identifies an item within its collection
pub const ID_FIELD: &str = "id";

/// One record within a collection
pub type Item = Map<String, Value>;

/// The full persisted structure: collection key -> items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    collections: IndexMap<String, Vec<Item>>,
}

impl Document {
    /// Canonical empty document: one empty sequence per known collection.
    pub fn empty() -> Self {
        Self::default().with_known_collections()
    }

    /// Add any known collection missing from a loaded file.
    ///
    /// Unknown keys already present are left alone.
    pub(crate) fn with_known_collections(mut self) -> Self {
        for collection in Collection::ALL {
            self.collections
                .entry(collection.key().to_string())
                .or_default();
        }
        self
    }

    /// Collection keys, in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn collection(&self, key: &str) -> Option<&[Item]> {
        self.collections.get(key).map(Vec::as_slice)
    }

    pub fn collection_mut(&mut self, key: &str) -> Option<&mut Vec<Item>> {
        self.collections.get_mut(key)
    }

    /// Find an item by id within a collection
    pub fn find(&self, key: &str, id: &str) -> Option<&Item> {
        self.collection(key)?
            .iter()
            .find(|item| item_id(item) == Some(id))
    }

    /// Total number of items across every collection
    pub fn item_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    /// The document as a plain JSON value, for rendering.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.collections
                .iter()
                .map(|(key, items)| {
                    let items = items.iter().cloned().map(Value::Object).collect();
                    (key.clone(), Value::Array(items))
                })
                .collect(),
        )
    }
}

/// The item's `id`, if it has a string one.
pub fn item_id(item: &Item) -> Option<&str> {
    item.get(ID_FIELD).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_has_every_known_collection() {
        let doc = Document::empty();
        let keys: Vec<&str> = doc.keys().collect();
        let expected: Vec<&str> = Collection::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, expected);
        assert_eq!(doc.item_count(), 0);
    }

    #[test]
    fn test_known_collections_added_without_dropping_extras() {
        let doc: Document = serde_json::from_value(json!({
            "glossary": [{"id": "GLO001"}],
            "requirements": []
        }))
        .unwrap();
        let doc = doc.with_known_collections();

        let keys: Vec<&str> = doc.keys().collect();
        assert_eq!(keys[0], "glossary");
        assert_eq!(keys[1], "requirements");
        assert_eq!(keys.len(), 9);
    }

    #[test]
    fn test_find_by_id() {
        let mut doc = Document::empty();
        let reqs = doc.collection_mut("requirements").unwrap();
        reqs.push(item(json!({"id": "REQ001", "description": "a"})));
        reqs.push(item(json!({"id": "REQ002", "description": "b"})));

        let found = doc.find("requirements", "REQ002").unwrap();
        assert_eq!(found["description"], "b");
        assert!(doc.find("requirements", "REQ003").is_none());
        assert!(doc.find("nope", "REQ001").is_none());
    }

    #[test]
    fn test_non_string_id_is_not_an_id() {
        let it = item(json!({"id": 7}));
        assert_eq!(item_id(&it), None);
    }

    #[test]
    fn test_to_value_preserves_order() {
        let mut doc = Document::empty();
        doc.collection_mut("stakeholders")
            .unwrap()
            .push(item(json!({"name": "Ops", "id": "STK001"})));

        let value = doc.to_value();
        let first_item = &value["stakeholders"][0];
        let fields: Vec<&String> = first_item.as_object().unwrap().keys().collect();
        assert_eq!(fields, vec!["name", "id"]);
    }
}
