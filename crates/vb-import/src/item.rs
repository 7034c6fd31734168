//! Raw import item → typed [`ImportItem`].
//!
//! Runs the three pure stages of the import pipeline in order: legacy
//! aliasing, schema coercion, field canonicalization. The raw item is kept
//! verbatim in [`ImportItem::raw`] whatever happens to the parsed fields.

use serde_json::{Map, Value};
use vb_normalize::{normalize_opt, Field};
use vb_schemas::BottleRecord;

use crate::coerce::{opt_int, opt_joined_string, opt_number, opt_string, opt_year};
use crate::legacy::resolve_aliases;
use crate::ImportError;

/// Key reported for items whose `external_key` cannot be read.
pub const UNKNOWN_KEY: &str = "unknown";

/// A validated, canonicalized import item. Every field except the key is
/// optional; `None` means "not supplied" and never overwrites stored data.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    pub external_key: String,

    pub producer: Option<String>,
    pub wine: Option<String>,
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
    pub price_updated_at: Option<String>,
    pub price_sources: Option<Vec<String>>,
    pub sources: Option<Vec<String>>,

    /// Explicit incoming quantity; `None` when the item did not carry one.
    pub quantity: Option<i64>,
    pub location: Option<String>,
    pub bin: Option<String>,

    /// The untouched raw item.
    pub raw: Value,
}

/// Best-effort read of the natural key, used both for parsing and for
/// labelling rejections.
pub fn external_key_of(raw: &Value) -> Option<String> {
    match raw.get("external_key")? {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn canonical(field: Field, v: Option<String>) -> Option<String> {
    normalize_opt(field, v.as_deref())
}

/// First key in `keys` carrying a usable number.
fn first_number(
    obj: &Map<String, Value>,
    field: &'static str,
    keys: &[&str],
) -> Result<Option<f64>, ImportError> {
    for key in keys {
        if let Some(v) = opt_number(field, obj.get(*key))? {
            return Ok(Some(v));
        }
    }
    Ok(None)
}

impl ImportItem {
    /// Parse one raw item.
    pub fn from_raw(raw: &Value) -> Result<Self, ImportError> {
        let obj: &Map<String, Value> = raw.as_object().ok_or(ImportError::NotAnObject)?;
        let external_key = external_key_of(raw).ok_or(ImportError::MissingExternalKey)?;

        let legacy = resolve_aliases(obj)?;
        let get = |k: &str| obj.get(k);

        let quantity = opt_int("quantity", get("quantity"))?;
        if let Some(q) = quantity {
            if q < 0 {
                return Err(ImportError::invalid("quantity", format!("{q} is negative")));
            }
        }

        Ok(Self {
            external_key,
            producer: opt_string("producer", get("producer"))?,
            wine: opt_string("wine", get("wine"))?,
            vintage: opt_string("vintage", get("vintage"))?,
            country: opt_string("country", get("country"))?,
            region: opt_string("region", get("region"))?,
            appellation: opt_string("appellation", get("appellation"))?,
            color: canonical(Field::Color, opt_string("color", get("color"))?),
            wine_type: canonical(Field::Type, opt_string("type", get("type"))?),
            grapes: opt_joined_string("grapes", get("grapes"))?,
            abv: opt_number("abv", get("abv"))?,
            size_ml: opt_int("size_ml", get("size_ml"))?,
            barcode: opt_string("barcode", get("barcode"))?,
            window_start_year: opt_year("window_start_year", get("window_start_year"))?,
            window_end_year: opt_year("window_end_year", get("window_end_year"))?,
            peak_start_year: opt_year("peak_start_year", get("peak_start_year"))?,
            peak_end_year: opt_year("peak_end_year", get("peak_end_year"))?,
            window_source: canonical(
                Field::WindowSource,
                opt_string("window_source", get("window_source"))?,
            ),
            confidence: canonical(Field::Confidence, opt_string("confidence", get("confidence"))?),
            serving_temp_c: opt_number("serving_temp_c", get("serving_temp_c"))?,
            decanting: opt_string("decanting", get("decanting"))?,
            sweetness: canonical(Field::Sweetness, opt_string("sweetness", get("sweetness"))?),
            notes: opt_string("notes", get("notes"))?,
            price_min: first_number(obj, "price_min", &["price_min", "price_min_eur"])?,
            price_typical: first_number(
                obj,
                "price_typical",
                &["price_typical", "price_typical_eur"],
            )?,
            price_max: first_number(obj, "price_max", &["price_max", "price_max_eur"])?,
            price_updated_at: legacy.price_updated_at,
            price_sources: legacy.price_sources,
            sources: legacy.sources,
            quantity,
            location: canonical(Field::Location, opt_string("location", get("location"))?),
            bin: opt_string("bin", get("bin"))?,
            raw: raw.clone(),
        })
    }

    /// Overwrite every field of `record` for which this item carries a
    /// value, then store the raw item as provenance. Absent fields leave
    /// `record` untouched. Quantity, identity and timestamps are not
    /// handled here.
    pub fn apply_fields(&self, record: &mut BottleRecord) {
        self.patch_fields(record);
        // Provenance is replaced wholesale, never merged.
        record.legacy_json = Some(self.raw.clone());
    }

    /// Like [`apply_fields`](Self::apply_fields) but leaves `legacy_json`
    /// alone. Used for hand edits, which are not imports.
    pub fn patch_fields(&self, record: &mut BottleRecord) {
        fn put<T: Clone>(slot: &mut Option<T>, incoming: &Option<T>) {
            if let Some(v) = incoming {
                *slot = Some(v.clone());
            }
        }

        put(&mut record.producer, &self.producer);
        put(&mut record.wine, &self.wine);
        put(&mut record.vintage, &self.vintage);
        put(&mut record.country, &self.country);
        put(&mut record.region, &self.region);
        put(&mut record.appellation, &self.appellation);
        put(&mut record.color, &self.color);
        put(&mut record.wine_type, &self.wine_type);
        put(&mut record.grapes, &self.grapes);
        put(&mut record.abv, &self.abv);
        put(&mut record.size_ml, &self.size_ml);
        put(&mut record.barcode, &self.barcode);
        put(&mut record.window_start_year, &self.window_start_year);
        put(&mut record.window_end_year, &self.window_end_year);
        put(&mut record.peak_start_year, &self.peak_start_year);
        put(&mut record.peak_end_year, &self.peak_end_year);
        put(&mut record.window_source, &self.window_source);
        put(&mut record.confidence, &self.confidence);
        put(&mut record.serving_temp_c, &self.serving_temp_c);
        put(&mut record.decanting, &self.decanting);
        put(&mut record.sweetness, &self.sweetness);
        put(&mut record.notes, &self.notes);
        put(&mut record.price_min, &self.price_min);
        put(&mut record.price_typical, &self.price_typical);
        put(&mut record.price_max, &self.price_max);
        put(&mut record.price_updated_at, &self.price_updated_at);
        put(&mut record.location, &self.location);
        put(&mut record.bin, &self.bin);

        if let Some(v) = &self.price_sources {
            record.price_sources = v.clone();
        }
        if let Some(v) = &self.sources {
            record.sources = v.clone();
        }
    }
}
