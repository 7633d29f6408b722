//! Configuration loading for rundown

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".rundownrc.json";

/// Project configuration. CLI flags override every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Default report path, relative to the config file's directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
    /// Default dashboard output path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Dashboard title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Minimum pass rate percentage; below this the CLI exits 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,
}

impl Config {
    /// Overlay CLI flags onto config-file values
    pub fn merge_with_cli(
        mut self,
        threshold: Option<u8>,
        output: Option<&Path>,
        title: Option<&str>,
    ) -> Self {
        if threshold.is_some() {
            self.threshold = threshold;
        }
        if let Some(output) = output {
            self.output = Some(output.to_path_buf());
        }
        if let Some(title) = title {
            self.title = Some(title.to_string());
        }
        self
    }
}

/// Starter config written by `rundown init`
pub fn default_config(threshold: Option<u8>) -> Config {
    Config {
        report: Some(PathBuf::from("test-results.json")),
        output: Some(PathBuf::from("rundown-report.html")),
        title: None,
        threshold,
    }
}

/// Find and load the config file. Searches the working directory then its
/// parents; an explicit path that does not exist is an error, a missing
/// discovered config is just defaults.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Some(path)
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in config: {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

/// Search for .rundownrc.json in a directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
