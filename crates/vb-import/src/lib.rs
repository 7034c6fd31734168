//! vb-import
//!
//! Import reconciler: untyped JSON items in, owner-scoped bottle lines out.
//!
//! Pipeline per item:
//! - legacy field aliasing
//! - tolerant schema coercion (bad items are rejected, never panic)
//! - field canonicalization via `vb-normalize`
//! - lookup by `(external_key, owner_id)` through [`CellarStore`]
//! - create/merge/sync decision, then persist
//!
//! Everything up to the lookup is pure. The only IO is the store trait.
//! A batch never aborts on a bad item; rejections are collected in order.

mod batch;
mod coerce;
mod error;
mod item;
mod legacy;
mod payload;
mod reconcile;
mod store;

pub use batch::{import_batch, reconcile_item, ImportFailure, ImportReport, ItemOutcome};
pub use coerce::parse_lenient_number;
pub use error::ImportError;
pub use item::{external_key_of, ImportItem, UNKNOWN_KEY};
pub use legacy::{normalize_sources, resolve_aliases, LegacyAliases};
pub use payload::ImportPayload;
pub use reconcile::{create_quantity, decide, merge_quantity, sync_quantity, Decision};
pub use store::CellarStore;
