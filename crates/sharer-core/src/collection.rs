//! The keyed tool collection and its persisted JSON form
//!
//! The document is a single JSON object mapping id to record. Two kinds of
//! entries are tolerated besides well-formed records:
//!
//! - a bare string is a legacy imported tool (`id -> html`)
//! - anything else that fails to parse is quarantined: kept verbatim so it
//!   survives the next save, but hidden from every read

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::record::{ImportedTool, ToolRecord};
use crate::{Error, Result};

/// Full set of tools keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    tools: BTreeMap<String, ToolRecord>,
    quarantined: BTreeMap<String, Value>,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of readable records.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ToolRecord> {
        self.tools.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut ToolRecord> {
        self.tools.get_mut(id)
    }

    /// Whether `id` is taken, including by a quarantined entry.
    pub fn contains_id(&self, id: &str) -> bool {
        self.tools.contains_key(id) || self.quarantined.contains_key(id)
    }

    /// Insert a record under its own id.
    ///
    /// Returns `false` and leaves the collection untouched if the id is taken.
    pub fn insert(&mut self, record: ToolRecord) -> bool {
        if self.contains_id(record.id()) {
            return false;
        }
        self.tools.insert(record.id().to_string(), record);
        true
    }

    /// Iterate over readable records in id order.
    pub fn records(&self) -> impl Iterator<Item = &ToolRecord> {
        self.tools.values()
    }

    /// Copy out all readable records.
    pub fn to_vec(&self) -> Vec<ToolRecord> {
        self.tools.values().cloned().collect()
    }

    /// Ids of entries that could not be parsed.
    pub fn quarantined_ids(&self) -> impl Iterator<Item = &str> {
        self.quarantined.keys().map(String::as_str)
    }

    /// Parse the persisted document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] if the document is not a JSON object.
    /// Individual bad entries do not fail the parse.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| Error::Corruption {
            reason: e.to_string(),
        })?;

        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                return Err(Error::Corruption {
                    reason: format!("expected a JSON object, found {}", json_type(&other)),
                });
            }
        };

        let mut collection = Self::new();
        for (id, entry) in entries {
            match entry {
                Value::String(code) => {
                    collection.tools.insert(
                        id.clone(),
                        ToolRecord::Imported(ImportedTool {
                            id,
                            code,
                            created_at: None,
                        }),
                    );
                }
                other => match serde_json::from_value::<ToolRecord>(other.clone()) {
                    Ok(record) if record.id() == id => {
                        collection.tools.insert(id, record);
                    }
                    Ok(record) => {
                        tracing::warn!(
                            key = %id,
                            record_id = %record.id(),
                            "record id does not match its key, quarantining"
                        );
                        collection.quarantined.insert(id, other);
                    }
                    Err(e) => {
                        tracing::warn!(key = %id, error = %e, "unreadable record, quarantining");
                        collection.quarantined.insert(id, other);
                    }
                },
            }
        }

        Ok(collection)
    }

    /// Render the persisted document, two-space indented.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut map = Map::new();
        for (id, raw) in &self.quarantined {
            map.insert(id.clone(), raw.clone());
        }
        for (id, record) in &self.tools {
            map.insert(id.clone(), serde_json::to_value(record)?);
        }
        Ok(serde_json::to_string_pretty(&Value::Object(map))?)
    }
}

impl FromIterator<ToolRecord> for Collection {
    fn from_iter<I: IntoIterator<Item = ToolRecord>>(iter: I) -> Self {
        let mut collection = Self::new();
        for record in iter {
            collection.insert(record);
        }
        collection
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_empty_collection() {
        let collection = Collection::from_json("{}").unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn legacy_string_entries_load_as_imported() {
        let collection = Collection::from_json(r#"{"abc": "<h1>hi</h1>"}"#).unwrap();

        let record = collection.get("abc").unwrap();
        assert_eq!(record.kind(), RecordKind::Imported);
        assert_eq!(record.code(), "<h1>hi</h1>");
        assert_eq!(record.created_at(), None);
    }

    #[test]
    fn non_object_document_is_corruption() {
        for doc in ["[]", "42", "\"text\"", "not json", ""] {
            let result = Collection::from_json(doc);
            assert!(
                matches!(result, Err(Error::Corruption { .. })),
                "{:?} should be corruption",
                doc
            );
        }
    }

    #[test]
    fn bad_entries_are_quarantined_and_preserved() {
        let doc = r#"{
            "good": {"kind": "published", "id": "good", "prompt": "p", "code": "c", "likes": 1, "createdAt": "2024-01-01T00:00:00Z"},
            "bad": {"kind": "published", "id": "bad", "prompt": "p", "code": "c", "likes": 1, "createdAt": "yesterday"}
        }"#;

        let collection = Collection::from_json(doc).unwrap();
        assert_eq!(collection.len(), 1);
        assert!(collection.get("bad").is_none());
        assert!(collection.contains_id("bad"));
        assert_eq!(collection.quarantined_ids().collect::<Vec<_>>(), vec!["bad"]);

        let reparsed: Value = serde_json::from_str(&collection.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reparsed["bad"]["createdAt"], "yesterday");
    }

    #[test]
    fn mismatched_key_is_quarantined() {
        let doc = r#"{"key": {"kind": "imported", "id": "other", "code": "c"}}"#;
        let collection = Collection::from_json(doc).unwrap();

        assert!(collection.is_empty());
        assert!(collection.contains_id("key"));
    }

    #[test]
    fn insert_refuses_taken_ids() {
        let doc = r#"{"x": {"kind": "unknown"}}"#;
        let mut collection = Collection::from_json(doc).unwrap();

        let record = ToolRecord::Imported(ImportedTool {
            id: "x".into(),
            code: "c".into(),
            created_at: None,
        });
        assert!(!collection.insert(record));
        assert!(collection.is_empty());
    }

    #[test]
    fn pretty_output_uses_two_space_indent() {
        let collection = Collection::from_json(r#"{"a": "<p/>"}"#).unwrap();
        let json = collection.to_json_pretty().unwrap();

        assert!(json.contains("\n  \"a\": {"), "got: {}", json);
        assert!(json.contains("\"kind\": \"imported\""));
    }
}
