use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use vb_normalize::{normalize, Field};
use vb_schemas::BottleRecord;
use vb_status::{status_of, BottleStatus, CoarseStatus};

/// List filter. Every set field must match; unset fields match everything.
///
/// Exact-match values go through the same canonicalization as imports, so
/// `Rouge` selects lines stored as `red`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottleFilter {
    /// Case-insensitive substring over the searchable text fields.
    pub q: Option<String>,
    pub color: Option<String>,
    pub wine_type: Option<String>,
    pub sweetness: Option<String>,
    pub confidence: Option<String>,
    pub window_source: Option<String>,
    pub location: Option<String>,
    /// A fine status (`ready_after_peak`) or a coarse bucket (`open_now`).
    pub status: Option<String>,
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle_lower))
        .unwrap_or(false)
}

/// A blank wanted value canonicalizes to nothing and matches everything.
fn eq_opt(field: Field, stored: &Option<String>, wanted: &Option<String>) -> bool {
    match wanted.as_deref().and_then(|w| normalize(field, w)) {
        None => true,
        Some(w) => stored.as_deref() == Some(w.as_str()),
    }
}

impl BottleFilter {
    pub fn is_empty(&self) -> bool {
        self == &BottleFilter::default()
    }

    pub fn matches(&self, b: &BottleRecord, now_year: i32) -> bool {
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            let hit = [
                b.producer.as_deref(),
                b.wine.as_deref(),
                b.appellation.as_deref(),
                b.region.as_deref(),
                b.country.as_deref(),
                b.vintage.as_deref(),
                b.barcode.as_deref(),
                Some(b.external_key.as_str()),
            ]
            .into_iter()
            .any(|field| contains_ci(field, &needle));
            if !hit {
                return false;
            }
        }

        if !(eq_opt(Field::Color, &b.color, &self.color)
            && eq_opt(Field::Type, &b.wine_type, &self.wine_type)
            && eq_opt(Field::Sweetness, &b.sweetness, &self.sweetness)
            && eq_opt(Field::Confidence, &b.confidence, &self.confidence)
            && eq_opt(Field::WindowSource, &b.window_source, &self.window_source)
            && eq_opt(Field::Location, &b.location, &self.location))
        {
            return false;
        }

        match self.status.as_deref() {
            None => true,
            Some(wanted) => {
                let status = status_of(b, now_year).status;
                if let Some(fine) = BottleStatus::parse(wanted) {
                    status == fine
                } else if let Some(coarse) = CoarseStatus::parse(wanted) {
                    status.coarse() == coarse
                } else {
                    false
                }
            }
        }
    }
}

/// Distinct values present in a cellar, for filter dropdowns. Sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub colors: Vec<String>,
    pub types: Vec<String>,
    pub confidences: Vec<String>,
    pub window_sources: Vec<String>,
    pub sweetnesses: Vec<String>,
    pub locations: Vec<String>,
}

impl FilterOptions {
    pub fn collect<'a>(bottles: impl IntoIterator<Item = &'a BottleRecord>) -> Self {
        let mut colors = BTreeSet::new();
        let mut types = BTreeSet::new();
        let mut confidences = BTreeSet::new();
        let mut window_sources = BTreeSet::new();
        let mut sweetnesses = BTreeSet::new();
        let mut locations = BTreeSet::new();

        for b in bottles {
            colors.extend(b.color.clone());
            types.extend(b.wine_type.clone());
            confidences.extend(b.confidence.clone());
            window_sources.extend(b.window_source.clone());
            sweetnesses.extend(b.sweetness.clone());
            locations.extend(b.location.clone());
        }

        Self {
            colors: colors.into_iter().collect(),
            types: types.into_iter().collect(),
            confidences: confidences.into_iter().collect(),
            window_sources: window_sources.into_iter().collect(),
            sweetnesses: sweetnesses.into_iter().collect(),
            locations: locations.into_iter().collect(),
        }
    }
}
