//! JSON reporter for machine-readable output

use crate::normalizer::NormalizedRun;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Serialize the full normalized run: global stats, suite stats, test
    /// records, and the data-source flag.
    pub fn report(&self, run: &NormalizedRun) -> String {
        if self.pretty {
            serde_json::to_string_pretty(run).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(run).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}
