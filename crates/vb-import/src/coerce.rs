//! Tolerant scalar coercion for untyped import values.
//!
//! Rules shared by every field:
//! - `null` is absent.
//! - Strings are trimmed; `""` and `"nan"` (any case) are absent.
//! - Arrays and objects are never silently accepted where a scalar is
//!   expected; they reject the item with [`ImportError::InvalidField`].
//!
//! Numeric strings are parsed leniently (`"14.5%"`, `"13,5"`, `" 750 "`).
//! A numeric string that still does not parse is treated as absent rather
//! than as an error: spreadsheets routinely carry `"n/a"` or `"?"` cells.

use serde_json::Value;

use crate::ImportError;

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn clean_str(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(t.to_string())
    }
}

/// Optional text field. Numbers and booleans are stringified.
pub fn opt_string(field: &'static str, v: Option<&Value>) -> Result<Option<String>, ImportError> {
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(clean_str(s)),
        Some(Value::Number(n)) => Ok(clean_str(&n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(ImportError::invalid(
            field,
            format!("expected text, got {}", kind(other)),
        )),
    }
}

/// Parse a human-entered decimal: strips the first `%`, turns the first
/// decimal comma into a dot, trims. Only finite results are accepted.
pub fn parse_lenient_number(s: &str) -> Option<f64> {
    let normalized = s.replacen('%', "", 1).replacen(',', ".", 1);
    let t = normalized.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Optional floating-point field.
pub fn opt_number(field: &'static str, v: Option<&Value>) -> Result<Option<f64>, ImportError> {
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64().filter(|f| f.is_finite())),
        Some(Value::String(s)) => Ok(parse_lenient_number(s)),
        Some(other) => Err(ImportError::invalid(
            field,
            format!("expected a number, got {}", kind(other)),
        )),
    }
}

/// Optional integer field: parsed as a number, then truncated toward zero.
pub fn opt_int(field: &'static str, v: Option<&Value>) -> Result<Option<i64>, ImportError> {
    if let Some(Value::Number(n)) = v {
        if let Some(i) = n.as_i64() {
            return Ok(Some(i));
        }
    }
    let Some(f) = opt_number(field, v)? else {
        return Ok(None);
    };
    let t = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return Err(ImportError::invalid(
            field,
            format!("{f} is out of integer range"),
        ));
    }
    Ok(Some(t as i64))
}

/// Optional calendar-year field.
pub fn opt_year(field: &'static str, v: Option<&Value>) -> Result<Option<i32>, ImportError> {
    match opt_int(field, v)? {
        None => Ok(None),
        Some(y) => i32::try_from(y)
            .map(Some)
            .map_err(|_| ImportError::invalid(field, format!("{y} is not a plausible year"))),
    }
}

/// Text field that may also arrive as a list (`grapes`): list entries are
/// stringified, blanks dropped, and joined with `", "`.
pub fn opt_joined_string(
    field: &'static str,
    v: Option<&Value>,
) -> Result<Option<String>, ImportError> {
    match v {
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => clean_str(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            if parts.is_empty() {
                Ok(None)
            } else {
                Ok(Some(parts.join(", ")))
            }
        }
        other => opt_string(field, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_trimmed_and_blank_is_absent() {
        assert_eq!(
            opt_string("region", Some(&json!("  Loire "))).unwrap(),
            Some("Loire".to_string())
        );
        assert_eq!(opt_string("region", Some(&json!("   "))).unwrap(), None);
        assert_eq!(opt_string("region", Some(&json!("NaN"))).unwrap(), None);
        assert_eq!(opt_string("region", Some(&json!(null))).unwrap(), None);
        assert_eq!(opt_string("region", None).unwrap(), None);
    }

    #[test]
    fn numbers_stringify_into_text_fields() {
        assert_eq!(
            opt_string("vintage", Some(&json!(2015))).unwrap(),
            Some("2015".to_string())
        );
    }

    #[test]
    fn object_in_text_field_is_rejected() {
        let err = opt_string("region", Some(&json!({"a": 1}))).unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidField {
                field: "region",
                ..
            }
        ));
    }

    #[test]
    fn lenient_numbers() {
        assert_eq!(parse_lenient_number("14.5%"), Some(14.5));
        assert_eq!(parse_lenient_number("13,5"), Some(13.5));
        assert_eq!(parse_lenient_number(" 750 "), Some(750.0));
        assert_eq!(parse_lenient_number("12 %"), Some(12.0));
        assert_eq!(parse_lenient_number(""), None);
        assert_eq!(parse_lenient_number("%"), None);
        assert_eq!(parse_lenient_number("abc"), None);
        assert_eq!(parse_lenient_number("inf"), None);
        assert_eq!(parse_lenient_number("NaN"), None);
        // Thousands separators are not supported.
        assert_eq!(parse_lenient_number("1,234.5"), None);
    }

    #[test]
    fn ints_truncate_toward_zero() {
        assert_eq!(opt_int("size_ml", Some(&json!("750"))).unwrap(), Some(750));
        assert_eq!(opt_int("size_ml", Some(&json!(749.9))).unwrap(), Some(749));
        assert_eq!(opt_int("quantity", Some(&json!("-2.7"))).unwrap(), Some(-2));
        assert_eq!(opt_int("quantity", Some(&json!("lots"))).unwrap(), None);
    }

    #[test]
    fn huge_numbers_are_rejected_not_saturated() {
        let err = opt_int("size_ml", Some(&json!(1e30))).unwrap_err();
        assert!(matches!(err, ImportError::InvalidField { field: "size_ml", .. }));
        let err = opt_year("window_start_year", Some(&json!(1e12))).unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidField {
                field: "window_start_year",
                ..
            }
        ));
    }

    #[test]
    fn boolean_in_number_field_is_rejected() {
        assert!(opt_number("abv", Some(&json!(true))).is_err());
    }

    #[test]
    fn grapes_list_is_joined() {
        assert_eq!(
            opt_joined_string("grapes", Some(&json!(["Syrah", " Grenache ", ""]))).unwrap(),
            Some("Syrah, Grenache".to_string())
        );
        assert_eq!(opt_joined_string("grapes", Some(&json!([]))).unwrap(), None);
        assert_eq!(
            opt_joined_string("grapes", Some(&json!("Pinot Noir"))).unwrap(),
            Some("Pinot Noir".to_string())
        );
    }
}
