//! Import payload envelope.
//!
//! Three shapes are accepted at the boundary and flattened to one ordered
//! item list before any item is looked at:
//!
//! - a single item object,
//! - a bare array of items,
//! - an envelope `{ "schema_version": .., "bottles": [..] }`.

use serde_json::Value;
use vb_schemas::ImportMode;

#[derive(Debug, Clone, PartialEq)]
pub enum ImportPayload {
    Single(Value),
    Batch(Vec<Value>),
    Envelope {
        schema_version: Value,
        bottles: Vec<Value>,
    },
}

impl ImportPayload {
    /// Classify a parsed JSON document.
    pub fn from_value(v: Value) -> Self {
        match v {
            Value::Array(items) => ImportPayload::Batch(items),
            Value::Object(mut map) => {
                let is_envelope = map.contains_key("schema_version")
                    && map.get("bottles").map(Value::is_array).unwrap_or(false);
                if is_envelope {
                    let schema_version = map.remove("schema_version").unwrap_or(Value::Null);
                    let bottles = match map.remove("bottles") {
                        Some(Value::Array(items)) => items,
                        _ => Vec::new(),
                    };
                    ImportPayload::Envelope {
                        schema_version,
                        bottles,
                    }
                } else {
                    ImportPayload::Single(Value::Object(map))
                }
            }
            // Scalars are passed through as a single (invalid) item so the
            // report explains the rejection instead of silently importing nothing.
            other => ImportPayload::Single(other),
        }
    }

    /// Mode the UI should pre-select for this payload: full-cellar envelopes
    /// default to sync, everything else to merge. Never consulted by the
    /// reconciler itself.
    pub fn suggested_mode(&self) -> ImportMode {
        match self {
            ImportPayload::Envelope { .. } => ImportMode::Sync,
            ImportPayload::Single(_) | ImportPayload::Batch(_) => ImportMode::Merge,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImportPayload::Single(_) => 1,
            ImportPayload::Batch(items) => items.len(),
            ImportPayload::Envelope { bottles, .. } => bottles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten to items in input order.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            ImportPayload::Single(item) => vec![item],
            ImportPayload::Batch(items) => items,
            ImportPayload::Envelope { bottles, .. } => bottles,
        }
    }
}

impl From<Value> for ImportPayload {
    fn from(v: Value) -> Self {
        ImportPayload::from_value(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_object() {
        let p = ImportPayload::from_value(json!({ "external_key": "a" }));
        assert!(matches!(p, ImportPayload::Single(_)));
        assert_eq!(p.suggested_mode(), ImportMode::Merge);
        assert_eq!(p.into_items().len(), 1);
    }

    #[test]
    fn bare_array_keeps_order() {
        let p = ImportPayload::from_value(json!([
            { "external_key": "a" },
            { "external_key": "b" },
        ]));
        assert_eq!(p.suggested_mode(), ImportMode::Merge);
        let keys: Vec<_> = p
            .into_items()
            .iter()
            .map(|v| v["external_key"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn envelope_suggests_sync() {
        let p = ImportPayload::from_value(json!({
            "schema_version": 2,
            "bottles": [{ "external_key": "a" }],
        }));
        assert_eq!(p.suggested_mode(), ImportMode::Sync);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn envelope_requires_array_bottles() {
        let p = ImportPayload::from_value(json!({
            "schema_version": 2,
            "bottles": "nope",
        }));
        assert!(matches!(p, ImportPayload::Single(_)));
        assert_eq!(p.suggested_mode(), ImportMode::Merge);
    }

    #[test]
    fn scalar_becomes_single_item() {
        let p = ImportPayload::from_value(json!(17));
        assert_eq!(p.into_items(), vec![json!(17)]);
    }
}
