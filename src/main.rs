//! Rundown: test-run dashboard CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rundown::config::{default_config, load_config, Config, CONFIG_FILENAME};
use rundown::history::{
    append_run, find_project_root, format_delta, load_history, previous_pass_rate, save_history,
};
use rundown::normalizer::{self, DataSource, NormalizedRun};
use rundown::reporter::{ConsoleReporter, HtmlReporter, JsonReporter};
use rundown::watcher::ReportWatcher;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_REPORT: &str = "test-results.json";
const DEFAULT_OUTPUT: &str = "rundown-report.html";

/// Rundown: test-run dashboard generator for Playwright JSON reports
#[derive(Parser, Debug)]
#[command(name = "rundown")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Test report JSON file (default: test-results.json, or config `report`)
    path: Option<PathBuf>,

    /// Output the normalized run as JSON
    #[arg(long, short)]
    json: bool,

    /// Write the HTML dashboard
    #[arg(long)]
    html: bool,

    /// Dashboard output path (implies --html)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Dashboard title
    #[arg(long)]
    title: Option<String>,

    /// Minimum pass rate percentage (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Do not record this run in .rundown-history.json
    #[arg(long)]
    no_history: bool,

    /// Path to config file (default: search .rundownrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch the report file and re-render on changes
    #[arg(long)]
    watch: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .rundownrc.json with sensible defaults
    Init {
        /// Minimum pass rate threshold (e.g. 90)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Some(Commands::Init { threshold, dir }) = args.command {
        return run_init(threshold, dir.as_deref());
    }

    let work_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&work_dir, args.config.as_deref())?.merge_with_cli(
        args.threshold,
        args.out.as_deref(),
        args.title.as_deref(),
    );

    let report_path = args
        .path
        .clone()
        .or_else(|| config.report.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT));

    if args.watch {
        return run_watch(&args, &config, &report_path);
    }

    render_once(&args, &config, &report_path)
}

/// One load-normalize-render cycle
fn render_once(args: &Args, config: &Config, report_path: &Path) -> Result<ExitCode> {
    let run = normalizer::load(report_path);

    // Trend history: only real reports are recorded, and the delta is
    // computed against the run list before this run is appended.
    let delta = if run.source == DataSource::Report && !args.no_history {
        let root = find_project_root(report_path)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let mut history = load_history(&root);
        let delta = format_delta(previous_pass_rate(&history), run.global.pass_rate);
        append_run(&mut history, &run.global);
        if let Err(e) = save_history(&root, &history) {
            if !args.quiet {
                eprintln!("{}: Failed to save history: {}", "Warning".yellow(), e);
            }
        }
        delta
    } else {
        String::new()
    };

    // `--out` is already merged into `config.output`
    if args.html || config.output.is_some() {
        write_dashboard(args, config, &run)?;
    }

    if args.json {
        let reporter = JsonReporter::new().pretty();
        println!("{}", reporter.report(&run));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&run, &delta);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.no_color {
            reporter = reporter.without_colors();
        }
        if args.verbose {
            reporter = reporter.verbose();
        }
        let name = report_path.display().to_string();
        reporter.report(&run, &name, &delta);
    }

    // Check threshold (config or CLI)
    if let Some(threshold) = config.threshold {
        if run.global.pass_rate < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "{}: Pass rate {}% is below threshold {}%",
                    "Failed".red().bold(),
                    run.global.pass_rate,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn write_dashboard(args: &Args, config: &Config, run: &NormalizedRun) -> Result<()> {
    let out = config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let mut reporter = HtmlReporter::new();
    if let Some(ref title) = config.title {
        reporter = reporter.with_title(title);
    }
    std::fs::write(&out, reporter.report(run))
        .with_context(|| format!("Failed to write dashboard to {}", out.display()))?;

    if !args.quiet && !args.json {
        eprintln!("{}: Dashboard written to {}", "Info".blue(), out.display());
    }
    Ok(())
}

/// Re-render whenever the report file is rewritten
fn run_watch(args: &Args, config: &Config, report_path: &Path) -> Result<ExitCode> {
    let watcher = ReportWatcher::watch(report_path)
        .with_context(|| format!("Failed to watch {}", report_path.display()))?;

    if !args.quiet {
        eprintln!(
            "{}: Watching {} for changes (Ctrl-C to stop)",
            "Info".blue(),
            report_path.display()
        );
    }

    // Watch mode ignores the threshold exit code; it only matters for
    // one-shot CI runs.
    let _ = render_once(args, config, report_path)?;
    while watcher.wait_for_change() {
        if !args.quiet {
            eprintln!("{}: Report changed, re-rendering", "Info".blue());
        }
        let _ = render_once(args, config, report_path)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(threshold: Option<u8>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::from(2));
    }

    let config = default_config(threshold);
    let content =
        serde_json::to_string_pretty(&config).context("Failed to serialize default config")?;
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    eprintln!("{}: Created {}", "Info".blue(), config_path.display());
    Ok(ExitCode::SUCCESS)
}
