//! Rundown: dashboard generator for Playwright JSON test reports
//!
//! This library flattens a nested, irregular test-report document into
//! normalized statistics and a queryable test list, and renders them as a
//! console summary, machine-readable JSON, or a self-contained HTML
//! dashboard.

pub mod config;
pub mod format;
pub mod history;
pub mod normalizer;
pub mod report;
pub mod reporter;
pub mod watcher;

use serde::{Deserialize, Serialize};

/// Separator joining suite titles into a resolved suite path
pub const SUITE_PATH_SEPARATOR: &str = " › ";

/// Canonical outcome class a raw test status normalizes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Passed,
    Failed,
    Skipped,
    /// Raw status outside the six known values
    Unknown,
}

impl Bucket {
    /// Classify a raw status string. Comparison is verbatim and
    /// case-sensitive: `"Passed"` is not `"passed"`.
    pub fn from_status(status: &str) -> Self {
        match status {
            "passed" | "expected" => Bucket::Passed,
            "failed" | "unexpected" => Bucket::Failed,
            "skipped" | "pending" => Bucket::Skipped,
            _ => Bucket::Unknown,
        }
    }

    /// Icon identifier for the view layer
    pub fn icon_key(self) -> &'static str {
        match self {
            Bucket::Passed => "check-circle",
            Bucket::Failed => "times-circle",
            Bucket::Skipped => "forward",
            Bucket::Unknown => "question-circle",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bucket::Passed => write!(f, "passed"),
            Bucket::Failed => write!(f, "failed"),
            Bucket::Skipped => write!(f, "skipped"),
            Bucket::Unknown => write!(f, "unknown"),
        }
    }
}

/// Error captured from a test's final attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// A single flattened test case.
///
/// Only the final attempt's status, duration, and error are kept; earlier
/// attempts are retries superseded by the final outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    /// Stable identifier derived from suite path, spec title, and test title
    pub id: String,
    pub title: String,
    /// Suite path and title joined with `›`
    pub full_title: String,
    /// Resolved `›`-joined suite path
    pub suite_name: String,
    /// Raw status string as reported (e.g. "expected")
    pub status: String,
    /// Normalized outcome bucket
    pub bucket: Bucket,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TestError>,
    /// Number of attempts beyond the first
    pub retry_count: usize,
    pub file_path: String,
}

/// Per-suite aggregate counters, keyed by resolved suite path.
///
/// Two suites at different tree positions with the same resolved path merge
/// into a single entry with summed counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteStats {
    pub name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub unknown: usize,
    pub duration_ms: u64,
}

impl SuiteStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Count one test outcome into this suite's counters
    pub fn record(&mut self, bucket: Bucket, duration_ms: u64) {
        self.total += 1;
        self.duration_ms += duration_ms;
        match bucket {
            Bucket::Passed => self.passed += 1,
            Bucket::Failed => self.failed += 1,
            Bucket::Skipped => self.skipped += 1,
            Bucket::Unknown => self.unknown += 1,
        }
    }
}

/// Run-wide aggregate statistics with derived rates.
///
/// `end_time_ms - start_time_ms` equals the sum of all record durations:
/// duration is modeled as purely additive, not wall-clock-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub unknown: usize,
    pub duration_ms: u64,
    /// Epoch milliseconds
    pub start_time_ms: i64,
    /// Epoch milliseconds; always `start_time_ms + duration_ms`
    pub end_time_ms: i64,
    /// Percentage rounded to the nearest integer; 0 when total is 0
    pub pass_rate: u8,
    pub fail_rate: u8,
    pub avg_duration_ms: u64,
}

impl RunStats {
    /// Finalize counters into stats with derived rates
    pub fn from_counts(counts: &SuiteStats, start_time_ms: i64) -> Self {
        let total = counts.total;
        Self {
            total,
            passed: counts.passed,
            failed: counts.failed,
            skipped: counts.skipped,
            unknown: counts.unknown,
            duration_ms: counts.duration_ms,
            start_time_ms,
            end_time_ms: start_time_ms + counts.duration_ms as i64,
            pass_rate: percentage(counts.passed, total),
            fail_rate: percentage(counts.failed, total),
            avg_duration_ms: if total == 0 {
                0
            } else {
                (counts.duration_ms as f64 / total as f64).round() as u64
            },
        }
    }
}

/// Integer percentage rounded to nearest; 0 when the denominator is 0
pub(crate) fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u8
}
