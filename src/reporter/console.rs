//! Console reporter with colored output

use crate::format::{format_duration, format_timestamp};
use crate::normalizer::{DataSource, NormalizedRun};
use crate::Bucket;
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Full run summary. `delta` is the pass-rate trend suffix from history
    /// (empty when there is no previous run).
    pub fn report(&self, run: &NormalizedRun, report_name: &str, delta: &str) {
        self.print_header(run, report_name);
        self.print_kpis(run, delta);
        self.print_suites(run);
        self.print_failures(run);
        println!();
    }

    /// One-line summary for quiet mode
    pub fn report_quiet(&self, run: &NormalizedRun, delta: &str) {
        let stats = &run.global;
        println!(
            "{} passed, {} failed, {} skipped of {} ({}%){}",
            stats.passed, stats.failed, stats.skipped, stats.total, stats.pass_rate, delta
        );
    }

    fn print_header(&self, run: &NormalizedRun, report_name: &str) {
        println!();
        println!("{}", format!("📋 Test Run Summary: {}", report_name).bold());
        if run.source == DataSource::Fixture {
            println!(
                "   {}",
                "No usable report found - showing fixture data".yellow()
            );
        }
        println!(
            "   Started: {} | Finished: {}",
            format_timestamp(Some(run.global.start_time_ms)),
            format_timestamp(Some(run.global.end_time_ms))
        );
        println!();
    }

    fn print_kpis(&self, run: &NormalizedRun, delta: &str) {
        let stats = &run.global;
        let bar = self.create_rate_bar(stats.pass_rate);

        println!("   Pass rate: {}{}", bar, delta.dimmed());
        println!(
            "   Total: {} | Passed: {} | Failed: {} | Skipped: {}",
            stats.total.to_string().bold(),
            self.count(stats.passed, |s| s.green()),
            self.count(stats.failed, |s| s.red()),
            self.count(stats.skipped, |s| s.yellow()),
        );
        if stats.unknown > 0 {
            println!(
                "   {} {} test(s) with unrecognized status",
                "⚠".yellow(),
                stats.unknown
            );
        }
        println!(
            "   Duration: {} (avg {} per test)",
            format_duration(stats.duration_ms),
            format_duration(stats.avg_duration_ms)
        );
        println!();
    }

    fn print_suites(&self, run: &NormalizedRun) {
        if run.suites.is_empty() {
            return;
        }
        println!("   {}", "Suites:".bold());
        for suite in &run.suites {
            if suite.total == 0 && !self.verbose {
                continue;
            }
            let bar = self.create_mini_bar(suite.passed, suite.total);
            let counts = format!("{:>3}/{}", suite.passed, suite.total);
            let colored_counts = if suite.failed > 0 || suite.unknown > 0 {
                counts.red()
            } else if suite.skipped > 0 {
                counts.yellow()
            } else {
                counts.green()
            };
            if self.verbose {
                println!(
                    "   {} {} {} ({})",
                    bar,
                    colored_counts,
                    suite.name,
                    format_duration(suite.duration_ms)
                );
            } else {
                println!("   {} {} {}", bar, colored_counts, suite.name);
            }
        }
        println!();
    }

    fn print_failures(&self, run: &NormalizedRun) {
        let failed: Vec<_> = run
            .tests
            .iter()
            .filter(|t| t.bucket == Bucket::Failed)
            .collect();
        if failed.is_empty() {
            return;
        }

        println!("   {}", "Failed tests:".bold());
        for test in failed {
            println!(
                "   {} {} ({})",
                "✗".red(),
                test.full_title,
                format_duration(test.duration_ms).dimmed()
            );
            if test.retry_count > 0 {
                println!(
                    "       {} retried {} time(s)",
                    "↺".yellow(),
                    test.retry_count
                );
            }
            if let Some(ref error) = test.error {
                for line in error.message.lines().take(if self.verbose { 20 } else { 3 }) {
                    println!("       {}", line.dimmed());
                }
                if self.verbose {
                    if let Some(ref stack) = error.stack {
                        for line in stack.lines() {
                            println!("       {}", line.dimmed());
                        }
                    }
                }
            }
        }
        println!();
    }

    fn count(&self, value: usize, paint: fn(String) -> colored::ColoredString) -> String {
        let s = value.to_string();
        if self.use_colors && value > 0 {
            paint(s).to_string()
        } else {
            s
        }
    }

    fn create_rate_bar(&self, rate: u8) -> String {
        let filled = (rate as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), rate);

        if self.use_colors {
            if rate >= 90 {
                bar.green().to_string()
            } else if rate >= 70 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, passed: usize, total: usize) -> String {
        let filled = if total == 0 {
            0
        } else {
            (passed * 10) / total
        };
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
