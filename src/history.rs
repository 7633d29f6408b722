//! Trend tracking - persist run summaries to .rundown-history.json

use crate::RunStats;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const HISTORY_FILENAME: &str = ".rundown-history.json";
const MAX_RUNS: usize = 50;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub runs: Vec<HistoryRun>,
}

/// One recorded run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRun {
    pub timestamp: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub pass_rate: u8,
    pub duration_ms: u64,
}

/// Find project root (directory containing .rundown-history.json or first
/// dir with package.json / .git)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() { start.parent()? } else { start };

    loop {
        if dir.join(HISTORY_FILENAME).exists() {
            return Some(dir.to_path_buf());
        }
        if dir.join("package.json").exists() || dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Load history from project root (or create empty)
pub fn load_history(project_root: &Path) -> HistoryFile {
    let path = project_root.join(HISTORY_FILENAME);
    if let Ok(content) = fs::read_to_string(&path) {
        if let Ok(history) = serde_json::from_str::<HistoryFile>(&content) {
            return history;
        }
    }
    HistoryFile::default()
}

/// Save history to project root
pub fn save_history(project_root: &Path, history: &HistoryFile) -> std::io::Result<()> {
    let path = project_root.join(HISTORY_FILENAME);
    let content = serde_json::to_string_pretty(history).unwrap_or_else(|_| "{}".to_string());
    fs::write(path, content)
}

/// Pass rate of the most recent recorded run
pub fn previous_pass_rate(history: &HistoryFile) -> Option<u8> {
    history.runs.last().map(|run| run.pass_rate)
}

/// Append a run summary, truncating to the most recent MAX_RUNS
pub fn append_run(history: &mut HistoryFile, stats: &RunStats) {
    history.runs.push(HistoryRun {
        timestamp: chrono::Utc::now().to_rfc3339(),
        total: stats.total,
        passed: stats.passed,
        failed: stats.failed,
        skipped: stats.skipped,
        pass_rate: stats.pass_rate,
        duration_ms: stats.duration_ms,
    });
    if history.runs.len() > MAX_RUNS {
        history.runs.drain(0..history.runs.len() - MAX_RUNS);
    }
}

/// Format delta for console: " [was 92%, up 3]" or " [unchanged at 92%]"
pub fn format_delta(previous: Option<u8>, current: u8) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    if prev == current {
        return format!(" [unchanged at {}%]", current);
    }
    let diff = current as i16 - prev as i16;
    if diff > 0 {
        format!(" [was {}%, up {}]", prev, diff)
    } else {
        format!(" [was {}%, down {}]", prev, -diff)
    }
}
