//! Integration tests: full normalize pipeline against test-reports/

use rundown::normalizer::{load, DataSource, SortColumn, SortDirection, StatusFilter};
use rundown::Bucket;
use std::path::Path;

const SAMPLE: &str = "test-reports/sample-report.json";

#[test]
fn sample_report_global_stats() {
    let run = load(Path::new(SAMPLE));

    assert_eq!(run.source, DataSource::Report);
    let g = &run.global;
    assert_eq!(g.total, 8);
    assert_eq!(g.passed, 4);
    assert_eq!(g.failed, 1);
    assert_eq!(g.skipped, 2);
    assert_eq!(g.unknown, 1);
    assert_eq!(g.total, g.passed + g.failed + g.skipped + g.unknown);
    assert_eq!(g.duration_ms, 33_160);
    assert_eq!(g.pass_rate, 50);
    assert_eq!(g.avg_duration_ms, 4_145);
}

#[test]
fn sample_report_timestamps_are_additive() {
    let run = load(Path::new(SAMPLE));
    let g = &run.global;

    // 2025-06-15T08:30:00Z
    assert_eq!(g.start_time_ms, 1_749_976_200_000);
    assert_eq!(g.end_time_ms, g.start_time_ms + g.duration_ms as i64);

    let record_sum: u64 = run.tests.iter().map(|t| t.duration_ms).sum();
    assert_eq!(g.duration_ms, record_sum);
}

#[test]
fn sample_report_suite_breakdown() {
    let run = load(Path::new(SAMPLE));

    let names: Vec<&str> = run.suites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Authentication",
            "Authentication › Login",
            "Authentication › Logout",
            "Catalog"
        ]
    );

    let login = &run.suites[1];
    assert_eq!(login.total, 3);
    assert_eq!(login.passed, 2);
    assert_eq!(login.failed, 1);
    assert_eq!(login.duration_ms, 2_230);

    let catalog = &run.suites[3];
    assert_eq!(catalog.total, 4);
    assert_eq!(catalog.passed, 1);
    assert_eq!(catalog.skipped, 2);
    assert_eq!(catalog.unknown, 1);

    let suite_total: usize = run.suites.iter().map(|s| s.total).sum();
    assert_eq!(suite_total, run.global.total);
}

#[test]
fn sample_report_spec_with_no_results_is_dropped() {
    let run = load(Path::new(SAMPLE));
    assert!(run.tests.iter().all(|t| t.title != "never executed"));
}

#[test]
fn sample_report_retry_keeps_final_attempt() {
    let run = load(Path::new(SAMPLE));
    let retried = run
        .tests
        .iter()
        .find(|t| t.title == "rejects invalid credentials")
        .unwrap();

    assert_eq!(retried.retry_count, 1);
    assert_eq!(retried.status, "passed");
    assert_eq!(retried.bucket, Bucket::Passed);
    assert_eq!(retried.duration_ms, 510);
    assert!(retried.error.is_none());
}

#[test]
fn sample_report_unexpected_is_failed_everywhere() {
    let run = load(Path::new(SAMPLE));

    let failed = run.by_status(StatusFilter::Only(Bucket::Failed));
    assert_eq!(failed.len(), 1);
    let test = failed[0];
    assert_eq!(test.title, "locks account after five attempts");
    assert_eq!(test.status, "unexpected");
    assert_eq!(
        test.error.as_ref().unwrap().message,
        "Timed out waiting for locked banner"
    );
}

#[test]
fn search_matches_suite_names() {
    let run = load(Path::new(SAMPLE));

    // "login" hits the three tests of "Authentication › Login" by suite
    // name regardless of their titles.
    let hits = run.search("login");
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|t| t.suite_name.contains("Login")));

    let hits = run.search("CATALOG");
    assert_eq!(hits.len(), 4);
}

#[test]
fn sort_by_duration_puts_slowest_last() {
    let run = load(Path::new(SAMPLE));
    let sorted = run.sort_by(SortColumn::Duration, SortDirection::Ascending);
    assert_eq!(sorted.last().unwrap().title, "sorts by price");
    assert_eq!(sorted.last().unwrap().duration_ms, 30_000);

    let durations: Vec<u64> = sorted.iter().map(|t| t.duration_ms).collect();
    let mut expected = durations.clone();
    expected.sort();
    assert_eq!(durations, expected);
}

#[test]
fn normalize_is_deterministic_across_loads() {
    let first = load(Path::new(SAMPLE));
    let second = load(Path::new(SAMPLE));

    assert_eq!(first.global, second.global);
    assert_eq!(first.suites, second.suites);
    assert_eq!(first.tests, second.tests);
}

#[test]
fn record_ids_are_unique_and_stable() {
    let run = load(Path::new(SAMPLE));
    let mut ids: Vec<&str> = run.tests.iter().map(|t| t.id.as_str()).collect();
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count, "ids are unique within a report");

    let login_form = run
        .tests
        .iter()
        .find(|t| t.title == "shows the login form")
        .unwrap();
    assert_eq!(
        login_form.id,
        "Authentication-›-Login-shows-the-login-form-shows-the-login-form"
    );
}

#[test]
fn empty_report_serves_fixture_with_flag() {
    let run = load(Path::new("test-reports/empty-report.json"));
    assert_eq!(run.source, DataSource::Fixture);
    assert_eq!(run.global.total, 21);
    assert_eq!(run.global.passed, 21);
    assert_eq!(run.suites.len(), 5);
}
