//! vb-schemas
//!
//! Record shapes shared by every vinboard crate: stored bottles, the opened
//! history log, and the import mode flag. No logic beyond constructors and
//! small accessors lives here.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A bottle line in one owner's cellar.
///
/// `external_key` is the natural key used by imports and is unique per owner,
/// not globally. Every descriptive field is optional: imports routinely carry
/// sparse data and the status engine tolerates whatever is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleRecord {
    pub id: String,
    pub owner_id: String,
    pub external_key: String,

    pub producer: Option<String>,
    pub wine: Option<String>,
    /// Free text; `"NV"` is a legitimate vintage.
    pub vintage: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub appellation: Option<String>,
    pub color: Option<String>,
    pub wine_type: Option<String>,
    pub grapes: Option<String>,
    pub abv: Option<f64>,
    pub size_ml: Option<i64>,
    pub barcode: Option<String>,

    pub window_start_year: Option<i32>,
    pub window_end_year: Option<i32>,
    pub peak_start_year: Option<i32>,
    pub peak_end_year: Option<i32>,
    pub window_source: Option<String>,
    pub confidence: Option<String>,

    pub serving_temp_c: Option<f64>,
    pub decanting: Option<String>,
    pub sweetness: Option<String>,
    pub notes: Option<String>,

    pub price_min: Option<f64>,
    pub price_typical: Option<f64>,
    pub price_max: Option<f64>,
    /// Kept exactly as supplied by the import source.
    pub price_updated_at: Option<String>,
    pub price_sources: Vec<String>,

    pub quantity: i64,
    pub location: Option<String>,
    pub bin: Option<String>,

    pub sources: Vec<String>,
    /// Raw import item, preserved verbatim for audit. Never interpreted.
    pub legacy_json: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BottleRecord {
    /// Empty record with a fresh id and quantity 1.
    pub fn new(
        owner_id: impl Into<String>,
        external_key: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            external_key: external_key.into(),
            producer: None,
            wine: None,
            vintage: None,
            country: None,
            region: None,
            appellation: None,
            color: None,
            wine_type: None,
            grapes: None,
            abv: None,
            size_ml: None,
            barcode: None,
            window_start_year: None,
            window_end_year: None,
            peak_start_year: None,
            peak_end_year: None,
            window_source: None,
            confidence: None,
            serving_temp_c: None,
            decanting: None,
            sweetness: None,
            notes: None,
            price_min: None,
            price_typical: None,
            price_max: None,
            price_updated_at: None,
            price_sources: Vec::new(),
            quantity: 1,
            location: None,
            bin: None,
            sources: Vec::new(),
            legacy_json: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Human label used in logs and CLI output: `producer wine vintage`.
    pub fn display_name(&self) -> String {
        [&self.producer, &self.wine, &self.vintage]
            .iter()
            .filter_map(|v| v.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One "opened" event in the history log.
///
/// Producer / wine / vintage are copied at open time so the history reads
/// the same after the bottle is edited or deleted. `bottle_id` may dangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedRecord {
    pub id: String,
    pub owner_id: String,
    pub bottle_id: Option<String>,
    pub external_key: String,
    pub producer: Option<String>,
    pub wine: Option<String>,
    pub vintage: Option<String>,
    pub quantity_opened: i64,
    pub tasting_notes: Option<String>,
    /// 0..=100
    pub rating_100: Option<i64>,
    pub opened_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OpenedRecord {
    /// Snapshot `bottle` at `opened_at`.
    pub fn snapshot(bottle: &BottleRecord, quantity_opened: i64, opened_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: bottle.owner_id.clone(),
            bottle_id: Some(bottle.id.clone()),
            external_key: bottle.external_key.clone(),
            producer: bottle.producer.clone(),
            wine: bottle.wine.clone(),
            vintage: bottle.vintage.clone(),
            quantity_opened,
            tasting_notes: None,
            rating_100: None,
            opened_at,
            created_at: opened_at,
        }
    }
}

/// How an import batch treats incoming quantities.
///
/// - `Merge`: quantities are additive onto the existing line.
/// - `Sync`: an explicit incoming quantity replaces the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    #[default]
    Merge,
    Sync,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Merge => "merge",
            ImportMode::Sync => "sync",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Some(ImportMode::Merge),
            "sync" => Some(ImportMode::Sync),
            _ => None,
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
