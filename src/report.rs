//! Raw wire model for Playwright JSON reports.
//!
//! Every field the normalizer does not strictly need is optional; a node
//! missing expected children deserializes to an empty default and
//! contributes nothing downstream.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Top-level report document as produced by the Playwright JSON reporter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReport {
    #[serde(default)]
    pub config: Option<RawConfig>,
    /// Absent means "no suite list" and routes to the fixture fallback
    #[serde(default)]
    pub suites: Option<Vec<RawSuite>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    #[serde(default)]
    pub actual_start_time: Option<StartTime>,
}

/// Run start time: either epoch milliseconds or a date string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StartTime {
    EpochMs(f64),
    Text(String),
}

impl RawReport {
    /// Resolve the run start time to epoch milliseconds.
    ///
    /// Returns `None` when the metadata is absent or unparseable; callers
    /// fall back to the current time and should treat the report time as
    /// unknown.
    pub fn start_time_ms(&self) -> Option<i64> {
        let start = self
            .config
            .as_ref()?
            .metadata
            .as_ref()?
            .actual_start_time
            .as_ref()?;
        match start {
            StartTime::EpochMs(ms) => Some(*ms as i64),
            StartTime::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
                .ok(),
        }
    }
}

/// A named grouping node; nests to arbitrary depth
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSuite {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub specs: Vec<RawSpec>,
    #[serde(default)]
    pub suites: Vec<RawSuite>,
}

/// A named test definition; its tests carry one entry per retry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpec {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub tests: Vec<RawTest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub results: Vec<RawAttempt>,
}

/// One execution instance of a test
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAttempt {
    #[serde(default)]
    pub status: Option<String>,
    /// Milliseconds; Playwright occasionally emits fractional values
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub error: Option<RawError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
}
