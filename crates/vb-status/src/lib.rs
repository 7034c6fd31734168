//! vb-status
//!
//! Drinking-window status engine.
//!
//! - Eight-state classification from window/peak years
//! - Coarse grouping derived from the fine states (never recomputed)
//! - Dashboard aggregation that ignores empty lines
//!
//! Deterministic, pure logic. No IO, no clock: the current year is always
//! passed in.

mod dashboard;
mod engine;
mod types;

pub use dashboard::{tally, DashboardStats};
pub use engine::{compute_status, range_label};
pub use types::*;

use vb_schemas::BottleRecord;

/// Convenience: classify a stored bottle.
pub fn status_of(bottle: &BottleRecord, now_year: i32) -> StatusResult {
    compute_status(&DrinkingWindow::from(bottle), now_year)
}
