//! Create-vs-merge decision for one validated item.
//!
//! Pure: the existing record (if any) and the clock are inputs.

use chrono::{DateTime, Utc};
use vb_schemas::{BottleRecord, ImportMode};

use crate::ImportItem;

/// What the store should do with an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No line exists for `(external_key, owner)`: insert this record.
    Create(BottleRecord),
    /// A line exists: persist this merged record in its place.
    Update(BottleRecord),
}

impl Decision {
    pub fn record(&self) -> &BottleRecord {
        match self {
            Decision::Create(r) | Decision::Update(r) => r,
        }
    }
}

/// Quantity for a brand-new line: the incoming value if positive, else 1.
pub fn create_quantity(incoming: Option<i64>) -> i64 {
    match incoming {
        Some(q) if q > 0 => q,
        _ => 1,
    }
}

/// Merge mode: incoming is added to what is on hand. An absent or zero
/// incoming quantity counts as one bottle.
pub fn merge_quantity(existing: i64, incoming: Option<i64>) -> i64 {
    existing.max(0).saturating_add(create_quantity(incoming))
}

/// Sync mode: an explicit incoming quantity replaces the stored one;
/// otherwise the stored quantity stands.
pub fn sync_quantity(existing: i64, incoming: Option<i64>) -> i64 {
    match incoming {
        Some(q) => q.max(0),
        None => existing.max(0),
    }
}

/// Decide how `item` lands in `owner_id`'s cellar.
///
/// `existing` must be the result of looking up `(item.external_key,
/// owner_id)`; the caller owns that lookup.
pub fn decide(
    item: &ImportItem,
    existing: Option<&BottleRecord>,
    owner_id: &str,
    mode: ImportMode,
    now: DateTime<Utc>,
) -> Decision {
    match existing {
        None => {
            let mut rec = BottleRecord::new(owner_id, item.external_key.clone(), now);
            item.apply_fields(&mut rec);
            rec.quantity = create_quantity(item.quantity);
            Decision::Create(rec)
        }
        Some(current) => {
            let mut rec = current.clone();
            item.apply_fields(&mut rec);
            rec.quantity = match mode {
                ImportMode::Merge => merge_quantity(current.quantity, item.quantity),
                ImportMode::Sync => sync_quantity(current.quantity, item.quantity),
            };
            rec.updated_at = now;
            Decision::Update(rec)
        }
    }
}
