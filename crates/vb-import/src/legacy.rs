//! Legacy field aliasing.
//!
//! Older exports used different names and encodings for a few fields:
//!
//! | canonical          | accepted aliases                                   |
//! |--------------------|----------------------------------------------------|
//! | `sources`          | `sources_json`                                     |
//! | `price_sources`    | `price_sources_json`                               |
//! | `price_updated_at` | `price_checked_at`, `price_checked_date`           |
//!
//! Source lists may be native arrays or JSON-encoded strings, and entries
//! may be plain strings or `{type, url}` objects.

use serde_json::{Map, Value};

use crate::coerce;
use crate::ImportError;

/// Canonical values recovered from legacy aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyAliases {
    /// `None` when no source list was supplied (or it was not a list).
    pub sources: Option<Vec<String>>,
    pub price_sources: Option<Vec<String>>,
    pub price_updated_at: Option<String>,
}

/// Decode a JSON-encoded string; anything else (or an undecodable string)
/// is returned unchanged.
fn decode_embedded_json(value: &Value) -> Value {
    match value {
        Value::String(s) => serde_json::from_str(s.trim()).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

fn source_entry(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Object(obj) => match obj.get("url").and_then(Value::as_str).map(str::trim) {
            Some(url) if !url.is_empty() => Some(url.to_string()),
            _ => Some(entry.to_string()),
        },
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) => Some(entry.to_string()),
        Value::Null | Value::Bool(_) => None,
    }
}

/// Normalize a source list to ordered strings.
///
/// Returns `None` when `value` does not decode to a list.
pub fn normalize_sources(value: &Value) -> Option<Vec<String>> {
    match decode_embedded_json(value) {
        Value::Array(entries) => Some(entries.iter().filter_map(source_entry).collect()),
        _ => None,
    }
}

fn first_present<'a>(item: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| item.get(*k))
        .find(|v| !v.is_null())
}

/// Resolve every legacy alias on `item`.
pub fn resolve_aliases(item: &Map<String, Value>) -> Result<LegacyAliases, ImportError> {
    let sources = first_present(item, &["sources", "sources_json"]).and_then(normalize_sources);
    let price_sources = first_present(item, &["price_sources", "price_sources_json"])
        .and_then(normalize_sources);

    let mut price_updated_at = None;
    for key in ["price_updated_at", "price_checked_at", "price_checked_date"] {
        if let Some(v) = coerce::opt_string("price_updated_at", item.get(key))? {
            price_updated_at = Some(v);
            break;
        }
    }

    Ok(LegacyAliases {
        sources,
        price_sources,
        price_updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn json_encoded_sources_are_decoded() {
        let item = obj(json!({
            "external_key": "legacy-1",
            "sources_json": "[\"foo\", \"bar\"]",
        }));
        let a = resolve_aliases(&item).unwrap();
        assert_eq!(a.sources, Some(vec!["foo".to_string(), "bar".to_string()]));
    }

    #[test]
    fn object_entries_yield_url_or_json() {
        let item = obj(json!({
            "price_sources_json": "[{\"type\":\"shop\",\"url\":\"https://example.com\"},{\"type\":\"note\"}]",
        }));
        let a = resolve_aliases(&item).unwrap();
        assert_eq!(
            a.price_sources,
            Some(vec![
                "https://example.com".to_string(),
                "{\"type\":\"note\"}".to_string()
            ])
        );
    }

    #[test]
    fn canonical_name_wins_over_alias() {
        let item = obj(json!({
            "sources": ["canonical"],
            "sources_json": ["legacy"],
        }));
        assert_eq!(
            resolve_aliases(&item).unwrap().sources,
            Some(vec!["canonical".to_string()])
        );
    }

    #[test]
    fn null_canonical_falls_back_to_alias() {
        let item = obj(json!({
            "sources": null,
            "sources_json": ["legacy"],
        }));
        assert_eq!(
            resolve_aliases(&item).unwrap().sources,
            Some(vec!["legacy".to_string()])
        );
    }

    #[test]
    fn non_list_sources_are_absent() {
        assert_eq!(normalize_sources(&json!("not json")), None);
        assert_eq!(normalize_sources(&json!("{\"a\":1}")), None);
        assert_eq!(normalize_sources(&json!(5)), None);
        assert_eq!(normalize_sources(&json!([])), Some(vec![]));
    }

    #[test]
    fn null_and_blank_entries_are_dropped() {
        assert_eq!(
            normalize_sources(&json!(["a", null, "  ", 7, true])),
            Some(vec!["a".to_string(), "7".to_string()])
        );
    }

    #[test]
    fn price_date_aliases_in_priority_order() {
        let item = obj(json!({ "price_checked_at": "2024-01-01" }));
        assert_eq!(
            resolve_aliases(&item).unwrap().price_updated_at.as_deref(),
            Some("2024-01-01")
        );

        let item = obj(json!({
            "price_checked_date": "2023-05-05",
            "price_checked_at": "2024-01-01",
        }));
        assert_eq!(
            resolve_aliases(&item).unwrap().price_updated_at.as_deref(),
            Some("2024-01-01")
        );

        let item = obj(json!({
            "price_updated_at": " ",
            "price_checked_date": "2023-05-05",
        }));
        assert_eq!(
            resolve_aliases(&item).unwrap().price_updated_at.as_deref(),
            Some("2023-05-05")
        );
    }
}
