//! vb-store
//!
//! In-process cellar backed by a pretty-printed JSON file.
//!
//! - Implements `vb_import::CellarStore`, so import batches write here
//! - One line per `(external_key, owner_id)`; every query is owner-scoped
//! - Direct entry and edits reuse the import item shape and its checks
//! - Quantity adjustments never take a line below zero
//! - Opening bottles decrements the line and appends a history snapshot
//! - Deleting a line cascades to its opened history
//!
//! State sits behind a `tokio::sync::RwLock`. Persistence is explicit:
//! callers `load` at start and `save` when done.

mod cellar;
mod error;
mod filter;

pub use cellar::{Cellar, CellarSnapshot, Deleted, OpenRequest, OpenedUpdate};
pub use error::StoreError;
pub use filter::{BottleFilter, FilterOptions};
