//! Pure formatting helpers shared by the console and HTML surfaces.
//!
//! These are stateless functions of their input; the view layer calls them
//! but they carry no view logic.

use chrono::{TimeZone, Utc};

/// Human-readable duration: `412ms`, `5.82s`, `2m 3s`
pub fn format_duration(ms: u64) -> String {
    if ms < 1_000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = ((ms % 60_000) as f64 / 1000.0).round();
        format!("{minutes}m {seconds:.0}s")
    }
}

/// Human-readable UTC timestamp from epoch milliseconds; `N/A` when absent
/// or out of range.
pub fn format_timestamp(epoch_ms: Option<i64>) -> String {
    match epoch_ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
        Some(dt) => dt.format("%b %d, %Y, %H:%M:%S").to_string(),
        None => "N/A".to_string(),
    }
}
