//! Scenario: drinking-window classification
//!
//! # Invariants under test
//!
//! 1. Missing window start or end → `to_verify`, whatever else is set.
//! 2. `now < window_start` → `wait`.
//! 3. Inside both peak bounds → `peak`, even when the window closes within a year.
//! 4. `window_end - now` in {0, 1} and not in peak → `drink_soon`.
//! 5. `now > window_end` → `possibly_past`.
//! 6. Before / after peak refinements inside the window.
//!
//! All tests are pure in-process.

use vb_status::*;

fn classify(ws: Option<i32>, we: Option<i32>, ps: Option<i32>, pe: Option<i32>, now: i32) -> BottleStatus {
    compute_status(&DrinkingWindow::new(ws, we, ps, pe), now).status
}

const YEARS: std::ops::RangeInclusive<i32> = 2015..=2045;

// ---------------------------------------------------------------------------
// 1. Missing window bound
// ---------------------------------------------------------------------------

#[test]
fn missing_window_bound_is_always_to_verify() {
    let peaks = [None, Some(2020), Some(2030)];
    for now in YEARS {
        for ps in peaks {
            for pe in peaks {
                assert_eq!(classify(None, Some(2030), ps, pe, now), BottleStatus::ToVerify);
                assert_eq!(classify(Some(2020), None, ps, pe, now), BottleStatus::ToVerify);
                assert_eq!(classify(None, None, ps, pe, now), BottleStatus::ToVerify);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Before window
// ---------------------------------------------------------------------------

#[test]
fn before_window_start_is_wait() {
    for now in 2000..2030 {
        assert_eq!(
            classify(Some(2030), Some(2040), Some(2032), Some(2036), now),
            BottleStatus::Wait,
            "now={now}"
        );
    }
}

// ---------------------------------------------------------------------------
// 3. Peak priority
// ---------------------------------------------------------------------------

#[test]
fn inside_peak_is_peak() {
    for now in 2026..=2028 {
        assert_eq!(
            classify(Some(2024), Some(2030), Some(2026), Some(2028), now),
            BottleStatus::Peak
        );
    }
}

#[test]
fn peak_beats_drink_soon() {
    // Window ends next year and peak runs to the end: still peak.
    assert_eq!(
        classify(Some(2020), Some(2027), Some(2025), Some(2027), 2026),
        BottleStatus::Peak
    );
    assert_eq!(
        classify(Some(2020), Some(2027), Some(2025), Some(2027), 2027),
        BottleStatus::Peak
    );
}

// ---------------------------------------------------------------------------
// 4. Drink soon
// ---------------------------------------------------------------------------

#[test]
fn last_two_window_years_are_drink_soon_outside_peak() {
    assert_eq!(
        classify(Some(2024), Some(2025), None, None, 2025),
        BottleStatus::DrinkSoon
    );
    assert_eq!(
        classify(Some(2020), Some(2030), None, None, 2029),
        BottleStatus::DrinkSoon
    );
    // Peak already over: drink_soon still beats ready_after_peak.
    assert_eq!(
        classify(Some(2020), Some(2030), Some(2022), Some(2025), 2030),
        BottleStatus::DrinkSoon
    );
    // Peak not yet started: drink_soon still beats ready_before_peak.
    assert_eq!(
        classify(Some(2020), Some(2030), Some(2031), Some(2035), 2029),
        BottleStatus::DrinkSoon
    );
}

// ---------------------------------------------------------------------------
// 5. Past window
// ---------------------------------------------------------------------------

#[test]
fn after_window_end_is_possibly_past() {
    for now in 2031..2060 {
        assert_eq!(
            classify(Some(2020), Some(2030), Some(2024), Some(2026), now),
            BottleStatus::PossiblyPast
        );
    }
}

// ---------------------------------------------------------------------------
// 6. Refinements
// ---------------------------------------------------------------------------

#[test]
fn reference_scenarios() {
    assert_eq!(
        classify(Some(2024), Some(2030), Some(2026), Some(2028), 2027),
        BottleStatus::Peak
    );
    // 2029 is one year before window end: drink_soon, not ready_after_peak.
    assert_eq!(
        classify(Some(2024), Some(2030), Some(2026), Some(2028), 2029),
        BottleStatus::DrinkSoon
    );
    assert_eq!(
        classify(Some(2024), Some(2032), Some(2026), Some(2028), 2029),
        BottleStatus::ReadyAfterPeak
    );
    assert_eq!(
        classify(Some(2024), Some(2030), Some(2026), Some(2028), 2025),
        BottleStatus::ReadyBeforePeak
    );
    assert_eq!(
        classify(Some(2024), Some(2030), None, None, 2026),
        BottleStatus::Ready
    );
}

#[test]
fn coarse_grouping_collapses_ready_states() {
    for s in [
        BottleStatus::Peak,
        BottleStatus::Ready,
        BottleStatus::ReadyBeforePeak,
        BottleStatus::ReadyAfterPeak,
    ] {
        assert_eq!(s.coarse(), CoarseStatus::OpenNow);
    }
    assert_eq!(BottleStatus::DrinkSoon.coarse(), CoarseStatus::DrinkSoon);
    assert_eq!(BottleStatus::Wait.coarse(), CoarseStatus::Wait);
    assert_eq!(BottleStatus::ToVerify.coarse(), CoarseStatus::ToVerify);
    assert_eq!(BottleStatus::PossiblyPast.coarse(), CoarseStatus::PossiblyPast);
}

#[test]
fn status_strings_round_trip_through_parse() {
    for s in BottleStatus::ALL {
        assert_eq!(BottleStatus::parse(s.as_str()), Some(s));
    }
    assert_eq!(BottleStatus::parse("open_now"), None);
    assert_eq!(CoarseStatus::parse("OPEN_NOW"), Some(CoarseStatus::OpenNow));
}
