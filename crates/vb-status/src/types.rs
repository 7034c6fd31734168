use std::fmt;

use serde::{Deserialize, Serialize};
use vb_schemas::BottleRecord;

/// Drinkability classification. Canonical, fine-grained view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleStatus {
    ToVerify,
    Wait,
    Peak,
    ReadyBeforePeak,
    Ready,
    ReadyAfterPeak,
    DrinkSoon,
    PossiblyPast,
}

impl BottleStatus {
    pub const ALL: [BottleStatus; 8] = [
        BottleStatus::ToVerify,
        BottleStatus::Wait,
        BottleStatus::Peak,
        BottleStatus::ReadyBeforePeak,
        BottleStatus::Ready,
        BottleStatus::ReadyAfterPeak,
        BottleStatus::DrinkSoon,
        BottleStatus::PossiblyPast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BottleStatus::ToVerify => "to_verify",
            BottleStatus::Wait => "wait",
            BottleStatus::Peak => "peak",
            BottleStatus::ReadyBeforePeak => "ready_before_peak",
            BottleStatus::Ready => "ready",
            BottleStatus::ReadyAfterPeak => "ready_after_peak",
            BottleStatus::DrinkSoon => "drink_soon",
            BottleStatus::PossiblyPast => "possibly_past",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    /// Grouped view used by the dashboard and older list filters.
    pub fn coarse(&self) -> CoarseStatus {
        match self {
            BottleStatus::ToVerify => CoarseStatus::ToVerify,
            BottleStatus::Wait => CoarseStatus::Wait,
            BottleStatus::Peak
            | BottleStatus::ReadyBeforePeak
            | BottleStatus::Ready
            | BottleStatus::ReadyAfterPeak => CoarseStatus::OpenNow,
            BottleStatus::DrinkSoon => CoarseStatus::DrinkSoon,
            BottleStatus::PossiblyPast => CoarseStatus::PossiblyPast,
        }
    }
}

impl fmt::Display for BottleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarsening of [`BottleStatus`]: every "drinkable now, not urgent" state
/// collapses into `OpenNow`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseStatus {
    ToVerify,
    Wait,
    OpenNow,
    DrinkSoon,
    PossiblyPast,
}

impl CoarseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoarseStatus::ToVerify => "to_verify",
            CoarseStatus::Wait => "wait",
            CoarseStatus::OpenNow => "open_now",
            CoarseStatus::DrinkSoon => "drink_soon",
            CoarseStatus::PossiblyPast => "possibly_past",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "to_verify" => Some(CoarseStatus::ToVerify),
            "wait" => Some(CoarseStatus::Wait),
            "open_now" => Some(CoarseStatus::OpenNow),
            "drink_soon" => Some(CoarseStatus::DrinkSoon),
            "possibly_past" => Some(CoarseStatus::PossiblyPast),
            _ => None,
        }
    }
}

/// The four year bounds the engine classifies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrinkingWindow {
    pub window_start: Option<i32>,
    pub window_end: Option<i32>,
    pub peak_start: Option<i32>,
    pub peak_end: Option<i32>,
}

impl DrinkingWindow {
    pub fn new(
        window_start: Option<i32>,
        window_end: Option<i32>,
        peak_start: Option<i32>,
        peak_end: Option<i32>,
    ) -> Self {
        Self {
            window_start,
            window_end,
            peak_start,
            peak_end,
        }
    }
}

impl From<&BottleRecord> for DrinkingWindow {
    fn from(b: &BottleRecord) -> Self {
        Self {
            window_start: b.window_start_year,
            window_end: b.window_end_year,
            peak_start: b.peak_start_year,
            peak_end: b.peak_end_year,
        }
    }
}

/// Classification plus display labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub status: BottleStatus,
    pub reason: String,
    /// `"{start}–{end}"`, `?` for a missing bound, empty if both missing.
    pub window_label: String,
    pub peak_label: String,
}
