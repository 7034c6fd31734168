//! vb-normalize
//!
//! Canonicalization of free-text enum-like bottle fields (color, type,
//! confidence, window source, location, sweetness).
//!
//! Pipeline per value: lowercase → NFD + strip combining marks → trim →
//! field synonym table. Unknown non-empty tokens pass through in their
//! normalized form; blank input yields `None`.
//!
//! Pure and deterministic. No IO. `normalize(f, normalize(f, x)) ==
//! normalize(f, x)` for every field and input.

mod tables;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fields that go through canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Color,
    Type,
    Confidence,
    WindowSource,
    Location,
    Sweetness,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Color,
        Field::Type,
        Field::Confidence,
        Field::WindowSource,
        Field::Location,
        Field::Sweetness,
    ];

    /// Import-payload key for this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Color => "color",
            Field::Type => "type",
            Field::Confidence => "confidence",
            Field::WindowSource => "window_source",
            Field::Location => "location",
            Field::Sweetness => "sweetness",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remove diacritics: `"Pétillant"` → `"Petillant"`.
pub fn strip_diacritics(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Field-agnostic token form: lowercase, diacritic-free, trimmed.
///
/// Lowercasing runs first so that characters whose lowercase form carries a
/// combining mark (e.g. `'İ'`) are stripped in the same pass.
pub fn normalize_token(value: &str) -> Option<String> {
    let lowered = value.to_lowercase();
    let stripped = strip_diacritics(&lowered);
    let token = stripped.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Canonicalize `raw` for `field`.
pub fn normalize(field: Field, raw: &str) -> Option<String> {
    let token = normalize_token(raw)?;
    let canonical = match tables::synonyms(field) {
        Some(map) => map.get(token.as_str()).map(|s| s.to_string()),
        None => None,
    };
    Some(canonical.unwrap_or(token))
}

/// Canonicalize an untyped JSON value.
///
/// Strings go through [`normalize`]; numbers and booleans are stringified
/// first; null, arrays and objects yield `None`.
pub fn normalize_value(field: Field, raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => normalize(field, s),
        Value::Number(n) => normalize(field, &n.to_string()),
        Value::Bool(b) => normalize(field, if *b { "true" } else { "false" }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// [`normalize`] over an optional input; `None` stays `None`.
pub fn normalize_opt(field: Field, raw: Option<&str>) -> Option<String> {
    raw.and_then(|s| normalize(field, s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rose_variants_collapse() {
        assert_eq!(normalize(Field::Color, "rosé").as_deref(), Some("rose"));
        assert_eq!(normalize(Field::Color, "Rose ").as_deref(), Some("rose"));
        assert_eq!(normalize(Field::Color, "ROSE").as_deref(), Some("rose"));
        assert_eq!(normalize(Field::Color, "ROSÉ").as_deref(), Some("rose"));
    }

    #[test]
    fn french_colors_map_to_english() {
        assert_eq!(normalize(Field::Color, "ROUGE").as_deref(), Some("red"));
        assert_eq!(normalize(Field::Color, "Blanc").as_deref(), Some("white"));
        assert_eq!(
            normalize(Field::Color, "Pétillant").as_deref(),
            Some("sparkling")
        );
        assert_eq!(
            normalize(Field::Color, "fortifié").as_deref(),
            Some("fortified")
        );
    }

    #[test]
    fn type_table() {
        assert_eq!(
            normalize(Field::Type, "Effervescent").as_deref(),
            Some("sparkling")
        );
        assert_eq!(
            normalize(Field::Type, "tranquille").as_deref(),
            Some("still")
        );
        // "rouge" is a color synonym, not a type synonym.
        assert_eq!(normalize(Field::Type, "rouge").as_deref(), Some("rouge"));
    }

    #[test]
    fn unknown_tokens_pass_through_normalized() {
        assert_eq!(
            normalize(Field::Color, "  Ambré ").as_deref(),
            Some("ambre")
        );
        assert_eq!(
            normalize(Field::Location, "Cave Nord").as_deref(),
            Some("cave nord")
        );
        assert_eq!(
            normalize(Field::Confidence, "HIGH").as_deref(),
            Some("high")
        );
    }

    #[test]
    fn blank_is_none() {
        for f in Field::ALL {
            assert_eq!(normalize(f, ""), None);
            assert_eq!(normalize(f, "   \t"), None);
        }
    }

    #[test]
    fn lone_combining_mark_is_blank() {
        assert_eq!(normalize(Field::Color, " \u{0301} "), None);
    }

    #[test]
    fn idempotent_on_awkward_inputs() {
        let inputs = [
            "rosé",
            "ROUGE",
            "a \u{0301}",
            "İstanbul",
            "ẞ",
            "Ολυμπος Σ",
            "  Effervescent  ",
            "fortifie",
            "x",
            "1.5",
        ];
        for f in Field::ALL {
            for raw in inputs {
                let once = normalize(f, raw);
                let twice = once.as_deref().and_then(|s| normalize(f, s));
                assert_eq!(once, twice, "field={f} raw={raw:?}");
            }
        }
    }

    #[test]
    fn value_entry_point() {
        assert_eq!(
            normalize_value(Field::Color, &json!("Rouge")).as_deref(),
            Some("red")
        );
        assert_eq!(
            normalize_value(Field::Location, &json!(12)).as_deref(),
            Some("12")
        );
        assert_eq!(normalize_value(Field::Color, &json!(null)), None);
        assert_eq!(normalize_value(Field::Color, &json!(["red"])), None);
    }

    #[test]
    fn strip_diacritics_keeps_base_letters() {
        assert_eq!(strip_diacritics("Vosne-Romanée"), "Vosne-Romanee");
        assert_eq!(strip_diacritics("Dom Pérignon"), "Dom Perignon");
    }
}
