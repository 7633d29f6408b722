//! CLI behavior tests: exit codes, output formats, fallback, init.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const SAMPLE: &str = "test-reports/sample-report.json";
const PASSING: &str = "test-reports/passing-report.json";
const MALFORMED: &str = "test-reports/malformed-report.json";
const EMPTY: &str = "test-reports/empty-report.json";

fn rundown_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rundown"))
}

#[test]
fn quiet_summary_line() {
    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE).arg("--quiet").arg("--no-history");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("4 passed, 1 failed, 2 skipped of 8 (50%)"));
}

#[test]
fn console_output_mentions_failed_test() {
    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE).arg("--no-history").arg("--no-color");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("locks account after five attempts"));
}

#[test]
fn json_output_valid() {
    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE).arg("--json").arg("--no-history");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let s = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(s.trim()).expect("valid JSON");

    assert_eq!(parsed["source"], "report");
    assert_eq!(parsed["global"]["total"], 8);
    assert_eq!(parsed["global"]["passed"], 4);
    assert_eq!(parsed["global"]["failed"], 1);
    assert_eq!(parsed["global"]["skipped"], 2);
    assert_eq!(parsed["global"]["unknown"], 1);
    assert!(parsed.get("suites").is_some());
    assert_eq!(parsed["tests"].as_array().unwrap().len(), 8);
}

#[test]
fn below_threshold_exit_1() {
    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE)
        .arg("--quiet")
        .arg("--no-history")
        .arg("--threshold")
        .arg("90");
    cmd.assert().failure().code(1);
}

#[test]
fn above_threshold_exit_0() {
    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE)
        .arg("--quiet")
        .arg("--no-history")
        .arg("--threshold")
        .arg("40");
    cmd.assert().success();
}

#[test]
fn threshold_at_exact_boundary_passes() {
    // passing-report.json has a 100% pass rate
    let mut cmd = rundown_cmd();
    cmd.arg(PASSING)
        .arg("--quiet")
        .arg("--no-history")
        .arg("--threshold")
        .arg("100");
    cmd.assert().success();
}

#[test]
fn threshold_failure_message_on_stderr() {
    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE)
        .arg("--no-history")
        .arg("--no-color")
        .arg("--threshold")
        .arg("90");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("below threshold"));
}

#[test]
fn malformed_report_falls_back_to_fixture() {
    let mut cmd = rundown_cmd();
    cmd.arg(MALFORMED).arg("--json").arg("--no-history");
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "fallback is not fatal");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not valid JSON"), "stderr: {stderr}");

    let s = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(s.trim()).unwrap();
    assert_eq!(parsed["source"], "fixture");
    assert_eq!(parsed["global"]["total"], 21);
    assert_eq!(parsed["global"]["passed"], 21);
}

#[test]
fn empty_report_falls_back_to_fixture() {
    let mut cmd = rundown_cmd();
    cmd.arg(EMPTY).arg("--json").arg("--no-history");
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no suite list"), "stderr: {stderr}");

    let parsed: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(parsed["source"], "fixture");
}

#[test]
fn missing_file_falls_back_to_fixture() {
    let mut cmd = rundown_cmd();
    cmd.arg("does-not-exist.json")
        .arg("--quiet")
        .arg("--no-history");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("21 passed"))
        .stderr(predicate::str::contains("failed to read report"));
}

#[test]
fn out_flag_writes_dashboard() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("dash.html");

    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE)
        .arg("--quiet")
        .arg("--no-history")
        .arg("--out")
        .arg(&out);
    cmd.assert().success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("const DATA="));
    assert!(html.contains("shows the login form"));
    assert!(html.contains("<!DOCTYPE html>"));
}

#[test]
fn title_flag_reaches_dashboard() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("dash.html");

    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE)
        .arg("--quiet")
        .arg("--no-history")
        .arg("--out")
        .arg(&out)
        .arg("--title")
        .arg("Release 1.4");
    cmd.assert().success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("<h1>Release 1.4</h1>"));
}

#[test]
fn init_creates_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join(".rundownrc.json");

    let mut cmd = rundown_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path());
    cmd.assert().success();

    assert!(config_path.exists(), ".rundownrc.json should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("test-results.json"));
    assert!(content.contains("rundown-report.html"));
}

#[test]
fn init_with_threshold_option() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut cmd = rundown_cmd();
    cmd.arg("init")
        .arg("--dir")
        .arg(dir.path())
        .arg("--threshold")
        .arg("85");
    cmd.assert().success();

    let content = fs::read_to_string(dir.path().join(".rundownrc.json")).unwrap();
    assert!(content.contains("85"));
}

#[test]
fn init_twice_refuses() {
    let dir = tempfile::TempDir::new().unwrap();
    rundown_cmd()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success();
    rundown_cmd()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn history_recorded_across_runs() {
    let dir = tempfile::TempDir::new().unwrap();
    // package.json marks the project root for history placement
    fs::write(dir.path().join("package.json"), "{}").unwrap();
    let report = dir.path().join("test-results.json");
    fs::copy(PASSING, &report).unwrap();

    rundown_cmd()
        .arg(&report)
        .arg("--quiet")
        .assert()
        .success();
    let second = rundown_cmd()
        .arg(&report)
        .arg("--quiet")
        .output()
        .unwrap();
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(
        stdout.contains("[unchanged at 100%]"),
        "second run shows delta: {stdout}"
    );

    let history = fs::read_to_string(dir.path().join(".rundown-history.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&history).unwrap();
    assert_eq!(parsed["runs"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["runs"][0]["passRate"], 100);
}

#[test]
fn fixture_runs_are_not_recorded_in_history() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), "{}").unwrap();

    rundown_cmd()
        .arg(dir.path().join("missing.json"))
        .arg("--quiet")
        .assert()
        .success();

    assert!(!dir.path().join(".rundown-history.json").exists());
}

#[test]
fn bad_config_file_exit_2() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("bad-config.json");
    fs::write(&config, "{ nope").unwrap();

    let mut cmd = rundown_cmd();
    cmd.arg(SAMPLE)
        .arg("--no-history")
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid JSON in config"));
}
