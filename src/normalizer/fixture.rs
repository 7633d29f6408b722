//! Fixture dataset served when no usable report is available.
//!
//! A fixed, all-passing run of 21 tests across 5 suites, so the dashboard
//! is exercisable without a real report. Callers distinguish it from real
//! data via [`DataSource::Fixture`].

use super::{DataSource, NormalizedRun};
use crate::report::{RawAttempt, RawReport, RawSpec, RawSuite, RawTest};

pub const FIXTURE_TOTAL_TESTS: usize = 21;
pub const FIXTURE_TOTAL_DURATION_MS: u64 = 5823;

/// Suite name, then (test title, duration ms) for each test
const FIXTURE_SUITES: &[(&str, &[(&str, u64)])] = &[
    (
        "Home Page Tests",
        &[
            ("should load home page successfully", 412),
            ("should display navigation elements", 238),
            ("should display cruise listings", 301),
            ("should have login link", 154),
            ("should have register link", 187),
        ],
    ),
    (
        "Login Page Tests",
        &[
            ("should load login page successfully", 356),
            ("should display login form elements", 221),
            ("should show error message for invalid credentials", 498),
            ("should navigate to register page", 143),
        ],
    ),
    (
        "Register Page Tests",
        &[
            ("should load register page successfully", 389),
            ("should display registration form elements", 247),
            ("should validate required fields", 312),
            ("should navigate to login page", 158),
        ],
    ),
    (
        "Cruises Page Tests",
        &[
            ("should load cruises page successfully", 445),
            ("should display cruise listings", 289),
            ("should have search/filter functionality", 206),
            ("should display cruise cards with details", 331),
            ("should allow viewing cruise details", 172),
        ],
    ),
    (
        "Contact Page Tests",
        &[
            ("should load contact page successfully", 298),
            ("should display contact form elements", 243),
            ("should validate contact form fields", 223),
        ],
    ),
];

/// Build the fixture run.
///
/// The dataset is assembled as a raw report and pushed through the normal
/// traversal so it obeys every invariant real data does; only the source
/// flag differs.
pub fn fallback_run() -> NormalizedRun {
    let suites = FIXTURE_SUITES
        .iter()
        .map(|(name, tests)| RawSuite {
            title: (*name).to_string(),
            specs: tests
                .iter()
                .map(|(title, duration)| RawSpec {
                    title: (*title).to_string(),
                    file: Some(spec_file(name)),
                    tests: vec![RawTest {
                        title: None,
                        results: vec![RawAttempt {
                            status: Some("passed".to_string()),
                            duration: Some(*duration as f64),
                            error: None,
                        }],
                    }],
                })
                .collect(),
            suites: vec![],
        })
        .collect();

    let raw = RawReport {
        config: None,
        suites: Some(suites),
    };
    let mut run = super::normalize(&raw);
    run.source = DataSource::Fixture;
    run
}

/// "Home Page Tests" -> "tests/home-page-tests.spec.js"
fn spec_file(suite_name: &str) -> String {
    let slug: String = suite_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("tests/{slug}.spec.js")
}
