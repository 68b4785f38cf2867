//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use colored::{Colorize, control};

use rdbms_harness::core::config::HarnessConfig;
use rdbms_harness::core::errors::Result;
use rdbms_harness::runner::{RunOptions, RunSummary, Runner};
use rdbms_harness::suite::{self, TestCase};

/// rdbms-test — runs conformance and performance tests for an RDBMS project.
#[derive(Debug, Parser)]
#[command(
    name = "rdbms-test",
    author,
    version,
    about = "Runs conformance and performance tests for a client/server RDBMS",
    long_about = None
)]
pub struct Cli {
    /// The test ordinal at which to start (the first test always runs).
    #[arg(long, default_value_t = 1, value_name = "N")]
    start: usize,
    /// The test ordinal at which to end (inclusive).
    #[arg(long, value_name = "N")]
    end: Option<usize>,
    /// Output only times; continue on when tests fail.
    #[arg(long)]
    timing_only: bool,
    /// Emit one JSON object per verdict instead of console lines.
    #[arg(long)]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Override the suite config file path (default: <ROOT>/rdbms-test.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// The root project directory from which to run the tests.
    #[arg(default_value = ".", value_name = "ROOT")]
    path: PathBuf,
}

/// Resolve configuration, discover the suite, and run it.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    if cli.no_color || !io::stdout().is_terminal() {
        control::set_override(false);
    }

    let config = HarnessConfig::load(&cli.path, cli.config.as_deref())?;
    let tests = suite::discover(&config.tests_dir(), &config.suite)?;

    if !cli.json {
        print_banner(&config, &tests);
        if !config.perf_enabled() {
            print_perf_disabled_warning();
        }
        if cli.timing_only {
            print_timing_only_notice();
        }
    }

    let options = RunOptions {
        start: cli.start,
        end: cli.end,
        timing_only: cli.timing_only,
        json: cli.json,
    };
    Runner::new(&config, options).run(&tests)
}

fn print_banner(config: &HarnessConfig, tests: &[TestCase]) {
    let root = std::fs::canonicalize(&config.root).unwrap_or_else(|_| config.root.clone());
    let names: Vec<String> = tests.iter().map(TestCase::script_file_name).collect();

    println!();
    println!("---");
    println!("{}", "Welcome to rdbms-test.".bold());
    println!("---");
    println!();
    println!("Your current working directory is {}", root.display());
    println!();
    println!("    Optional environment variables:");
    println!("    - RDBMS_DEBUG: 0, 1 - run tests from \"$RDBMS_ROOT/project_tests\"");
    println!("                   2 - run tests from \"$RDBMS_ROOT/project_tests_1M\"");
    println!("                       you can find these tests online");
    println!("                   3 - run tests from \"$RDBMS_ROOT/project_tests_10M\"");
    println!("                       you can generate these tests using the dataset generator");
    println!("                   4 - run tests from \"$RDBMS_ROOT/project_tests_100M\"");
    println!("                       you can generate these tests using the dataset generator");
    println!();
    println!(
        "Tests will be run on .{} files in `{}` on the following files:",
        config.suite.input_extension,
        config.tests_dir().display()
    );
    println!("{names:?}");
    println!();
}

fn print_perf_disabled_warning() {
    println!(
        "{} Performance tests are only possible with `RDBMS_DEBUG` set to 2 or higher",
        "WARNING:".cyan()
    );
    println!("as lots of data is needed to be able to accurately judge execution times.");
    println!("Performance tests are {}.", "disabled".red());
    println!();
}

fn print_timing_only_notice() {
    println!("{} Tests running in timing-only mode.", "NOTICE:".cyan());
    println!("Failure reports will be truncated, and failing tests will not end the tests.");
    println!();
}
