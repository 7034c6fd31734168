use serde::{Deserialize, Serialize};
use vb_schemas::BottleRecord;

use crate::{compute_status, BottleStatus, DrinkingWindow};

/// Per-bucket bottle-line counts for the dashboard cards.
///
/// `peak` lines are counted in both `peak` and `open_now`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub open_now: u64,
    pub peak: u64,
    pub drink_soon: u64,
    pub wait: u64,
    pub possibly_past: u64,
    pub to_verify: u64,
}

impl DashboardStats {
    /// Count one classified line.
    pub fn record(&mut self, status: BottleStatus) {
        match status {
            BottleStatus::ToVerify => self.to_verify += 1,
            BottleStatus::Wait => self.wait += 1,
            BottleStatus::Peak => {
                self.peak += 1;
                self.open_now += 1;
            }
            BottleStatus::DrinkSoon => self.drink_soon += 1,
            BottleStatus::ReadyBeforePeak | BottleStatus::Ready | BottleStatus::ReadyAfterPeak => {
                self.open_now += 1
            }
            BottleStatus::PossiblyPast => self.possibly_past += 1,
        }
    }
}

/// Aggregate bottles into dashboard buckets.
///
/// Lines with `quantity <= 0` are skipped entirely: a bottle with none left
/// is in no bucket.
pub fn tally<'a, I>(bottles: I, now_year: i32) -> DashboardStats
where
    I: IntoIterator<Item = &'a BottleRecord>,
{
    let mut stats = DashboardStats::default();
    for b in bottles {
        if b.quantity <= 0 {
            continue;
        }
        let r = compute_status(&DrinkingWindow::from(b), now_year);
        stats.record(r.status);
    }
    stats
}
