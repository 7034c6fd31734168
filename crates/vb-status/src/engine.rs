use crate::{BottleStatus, DrinkingWindow, StatusResult};

/// Render a year range for display: `"2024–2030"`, `"?–2030"`, or `""`.
pub fn range_label(start: Option<i32>, end: Option<i32>) -> String {
    if start.is_none() && end.is_none() {
        return String::new();
    }
    let fmt = |y: Option<i32>| y.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
    format!("{}\u{2013}{}", fmt(start), fmt(end))
}

fn classify(w: &DrinkingWindow, now_year: i32) -> (BottleStatus, &'static str) {
    let (start, end) = match (w.window_start, w.window_end) {
        (Some(s), Some(e)) => (s, e),
        _ => return (BottleStatus::ToVerify, "Missing window"),
    };

    if now_year < start {
        return (BottleStatus::Wait, "Before window");
    }

    // Peak wins over the window-end checks, even when the window is closing.
    if let (Some(ps), Some(pe)) = (w.peak_start, w.peak_end) {
        if ps <= now_year && now_year <= pe {
            return (BottleStatus::Peak, "Within peak");
        }
    }

    if now_year <= end {
        if i64::from(end) - i64::from(now_year) <= 1 {
            return (BottleStatus::DrinkSoon, "Window ending");
        }
        if matches!(w.peak_start, Some(ps) if now_year < ps) {
            return (BottleStatus::ReadyBeforePeak, "Before peak");
        }
        if matches!(w.peak_end, Some(pe) if now_year > pe) {
            return (BottleStatus::ReadyAfterPeak, "After peak");
        }
        return (BottleStatus::Ready, "Within window");
    }

    (BottleStatus::PossiblyPast, "After window")
}

/// Classify a drinking window against `now_year`.
///
/// Total over all inputs: sparse or contradictory years still yield a
/// definite status (worst case `ToVerify`). Quantity plays no part here;
/// callers that aggregate exclude empty lines themselves.
pub fn compute_status(w: &DrinkingWindow, now_year: i32) -> StatusResult {
    let (status, reason) = classify(w, now_year);
    StatusResult {
        status,
        reason: reason.to_string(),
        window_label: range_label(w.window_start, w.window_end),
        peak_label: range_label(w.peak_start, w.peak_end),
    }
}
