//! Report normalization: flattens the nested suite tree into aggregate
//! statistics and a queryable test list.
//!
//! A single synchronous pass folds the raw document into an immutable
//! [`NormalizedRun`]; there is no incremental update and no shared mutable
//! state between calls. Any failure to obtain a usable report routes to the
//! fixture dataset so the presentation layer always has something to render.

pub mod fixture;

use crate::report::{RawReport, RawSpec, RawSuite};
use crate::{Bucket, RunStats, SuiteStats, TestError, TestRecord, SUITE_PATH_SEPARATOR};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a report could not be loaded. All variants route to the fixture
/// fallback; the variant only drives the diagnostic message.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("report {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("report {path} has no suite list")]
    NoSuites { path: PathBuf },
}

/// Where the normalized data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// A real report was parsed
    Report,
    /// The hardcoded fixture dataset was served instead
    Fixture,
}

/// The normalizer's complete output: read-only snapshots, rebuilt from
/// scratch on every load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRun {
    pub global: RunStats,
    /// Ordered by first visit in depth-first traversal
    pub suites: Vec<SuiteStats>,
    /// Ordered by traversal: a suite's own specs before its child suites
    pub tests: Vec<TestRecord>,
    pub source: DataSource,
}

/// Status filter for [`NormalizedRun::by_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(Bucket),
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "passed" => Ok(StatusFilter::Only(Bucket::Passed)),
            "failed" => Ok(StatusFilter::Only(Bucket::Failed)),
            "skipped" => Ok(StatusFilter::Only(Bucket::Skipped)),
            "unknown" => Ok(StatusFilter::Only(Bucket::Unknown)),
            other => Err(format!(
                "unknown status filter '{other}' (expected all, passed, failed, skipped, or unknown)"
            )),
        }
    }
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    Suite,
    /// Raw status string, not the normalized bucket
    Status,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl NormalizedRun {
    /// Tests whose normalized bucket matches the filter; `All` is identity
    pub fn by_status(&self, filter: StatusFilter) -> Vec<&TestRecord> {
        match filter {
            StatusFilter::All => self.tests.iter().collect(),
            StatusFilter::Only(bucket) => {
                self.tests.iter().filter(|t| t.bucket == bucket).collect()
            }
        }
    }

    /// Case-insensitive substring match against test title or suite name.
    /// An empty query returns the full list unmodified.
    pub fn search(&self, query: &str) -> Vec<&TestRecord> {
        if query.is_empty() {
            return self.tests.iter().collect();
        }
        let needle = query.to_lowercase();
        self.tests
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.suite_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Stable sort; ties keep their original traversal order
    pub fn sort_by(&self, column: SortColumn, direction: SortDirection) -> Vec<&TestRecord> {
        let mut tests: Vec<&TestRecord> = self.tests.iter().collect();
        tests.sort_by(|a, b| {
            let ordering = match column {
                SortColumn::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
                SortColumn::Suite => a.suite_name.to_lowercase().cmp(&b.suite_name.to_lowercase()),
                SortColumn::Status => a.status.cmp(&b.status),
                SortColumn::Duration => a.duration_ms.cmp(&b.duration_ms),
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        tests
    }
}

/// One-pass accumulator, finalized exactly once into a [`NormalizedRun`]
#[derive(Default)]
struct Accumulator {
    suites: Vec<SuiteStats>,
    /// Resolved suite path -> position in `suites`
    index: HashMap<String, usize>,
    tests: Vec<TestRecord>,
    global: SuiteStats,
}

impl Accumulator {
    /// Index of the stats entry for a resolved path, created zeroed on
    /// first visit so the output order matches traversal order.
    fn suite_entry(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.suites.len();
        self.suites.push(SuiteStats::new(name));
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn finalize(self, start_time_ms: i64, source: DataSource) -> NormalizedRun {
        // Global duration is recomputed from the record list; the running
        // accumulator must agree with it (duration is purely additive).
        let duration_ms: u64 = self.tests.iter().map(|t| t.duration_ms).sum();
        debug_assert_eq!(duration_ms, self.global.duration_ms);

        let counts = SuiteStats {
            duration_ms,
            ..self.global
        };
        NormalizedRun {
            global: RunStats::from_counts(&counts, start_time_ms),
            suites: self.suites,
            tests: self.tests,
            source,
        }
    }
}

/// Normalize an already-deserialized report.
///
/// A report without a suite list short-circuits to the fixture dataset; the
/// returned [`DataSource`] makes the fallback observable to callers.
pub fn normalize(raw: &RawReport) -> NormalizedRun {
    let Some(suites) = raw.suites.as_ref() else {
        eprintln!(
            "{}: report has no suite list, serving fixture data",
            "Warning".yellow()
        );
        return fixture::fallback_run();
    };
    let start_time_ms = raw
        .start_time_ms()
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let mut acc = Accumulator::default();
    for suite in suites {
        walk_suite(suite, "", &mut acc);
    }
    acc.finalize(start_time_ms, DataSource::Report)
}

/// Read and normalize a report file. Transport and parse failures are
/// recovered locally: each cause logs its own warning, then the fixture
/// dataset is served.
pub fn load(path: &Path) -> NormalizedRun {
    match read_report(path) {
        Ok(raw) => normalize(&raw),
        Err(err) => {
            eprintln!("{}: {}", "Warning".yellow(), err);
            eprintln!(
                "{}: serving fixture data instead",
                "Warning".yellow()
            );
            fixture::fallback_run()
        }
    }
}

/// Read and parse a report file without normalizing it
pub fn read_report(path: &Path) -> Result<RawReport, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let report: RawReport =
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if report.suites.is_none() {
        return Err(LoadError::NoSuites {
            path: path.to_path_buf(),
        });
    }
    Ok(report)
}

/// Depth-first traversal carrying the accumulated path as an explicit
/// parameter. A suite's own specs are processed before its children.
fn walk_suite(suite: &RawSuite, parent_path: &str, acc: &mut Accumulator) {
    let name = if parent_path.is_empty() {
        suite.title.clone()
    } else {
        format!("{parent_path}{SUITE_PATH_SEPARATOR}{}", suite.title)
    };
    let idx = acc.suite_entry(&name);

    for spec in &suite.specs {
        walk_spec(spec, &name, idx, acc);
    }
    for child in &suite.suites {
        walk_suite(child, &name, acc);
    }
}

fn walk_spec(spec: &RawSpec, suite_name: &str, suite_idx: usize, acc: &mut Accumulator) {
    for test in &spec.tests {
        // Last attempt wins; an empty attempt list contributes nothing.
        let Some(last) = test.results.last() else {
            continue;
        };

        let status = last.status.clone().unwrap_or_else(|| "unknown".to_string());
        let bucket = Bucket::from_status(&status);
        if bucket == Bucket::Unknown {
            eprintln!(
                "{}: unrecognized test status '{}' in suite '{}'",
                "Warning".yellow(),
                status,
                suite_name
            );
        }

        let duration_ms = last.duration.unwrap_or(0.0).max(0.0) as u64;
        let title = test.title.clone().unwrap_or_else(|| spec.title.clone());
        let error = last.error.as_ref().map(|e| TestError {
            message: e.message.clone().unwrap_or_default(),
            stack: e.stack.clone(),
        });

        acc.suites[suite_idx].record(bucket, duration_ms);
        acc.global.record(bucket, duration_ms);
        acc.tests.push(TestRecord {
            id: test_id(suite_name, &spec.title, &title),
            full_title: format!("{suite_name}{SUITE_PATH_SEPARATOR}{title}"),
            title,
            suite_name: suite_name.to_string(),
            status,
            bucket,
            duration_ms,
            error,
            retry_count: test.results.len() - 1,
            file_path: spec.file.clone().unwrap_or_default(),
        });
    }
}

/// Deterministic id: suite path, spec title, and test title joined with
/// `-`, every whitespace run collapsed to a single `-`.
fn test_id(suite_name: &str, spec_title: &str, test_title: &str) -> String {
    let joined = format!("{suite_name}-{spec_title}-{test_title}");
    let mut id = String::with_capacity(joined.len());
    let mut in_whitespace = false;
    for c in joined.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('-');
            }
            in_whitespace = true;
        } else {
            id.push(c);
            in_whitespace = false;
        }
    }
    id
}
