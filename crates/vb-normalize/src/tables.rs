//! Static synonym tables. Keys are already in token form (lowercase, no
//! diacritics); every value is also a key that maps to itself.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::Field;

const COLOR: &[(&str, &str)] = &[
    ("rose", "rose"),
    ("rouge", "red"),
    ("red", "red"),
    ("blanc", "white"),
    ("white", "white"),
    ("orange", "orange"),
    ("sparkling", "sparkling"),
    ("effervescent", "sparkling"),
    ("petillant", "sparkling"),
    ("fortified", "fortified"),
    ("fortifie", "fortified"),
];

const TYPE: &[(&str, &str)] = &[
    ("still", "still"),
    ("tranquille", "still"),
    ("sparkling", "sparkling"),
    ("effervescent", "sparkling"),
    ("petillant", "sparkling"),
    ("fortified", "fortified"),
    ("fortifie", "fortified"),
];

static COLOR_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| COLOR.iter().copied().collect());

static TYPE_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| TYPE.iter().copied().collect());

/// Synonym table for `field`, or `None` when the field is token-only.
pub(crate) fn synonyms(field: Field) -> Option<&'static HashMap<&'static str, &'static str>> {
    match field {
        Field::Color => Some(&COLOR_MAP),
        Field::Type => Some(&TYPE_MAP),
        Field::Confidence | Field::WindowSource | Field::Location | Field::Sweetness => None,
    }
}
