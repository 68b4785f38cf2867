#![forbid(unsafe_code)]

//! rdbms-test — harness CLI entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    match cli_app::run(&args) {
        Ok(summary) => {
            // Timing-only runs record failures but still exit clean; only a
            // fail-fast halt or an interrupt is a non-zero exit.
            if summary.halted || summary.interrupted {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("rdbms-test: {e}");
            for line in e.remediation() {
                eprintln!("{line}");
            }
            std::process::exit(1);
        }
    }
}
