//! Report presenter: renders verdicts as tagged console lines or JSON.
//!
//! Rendering never fails. Formatting is plain string assembly and writes
//! ignore IO errors, so a broken pipe cannot lose a verdict mid-run.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use serde_json::json;

/// Outcome of one test execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Verdict {
    /// Output matched and every invariant held.
    Pass,
    /// One failure class with its diagnostic lines.
    Fail {
        /// Distinct reason lines (diff excerpt or a lifecycle diagnostic).
        reasons: Vec<String>,
    },
    /// Passed, but with an advisory (performance not evaluated).
    Warn {
        /// The advisory message.
        advisory: String,
    },
}

impl Verdict {
    /// Whether this verdict is a failure.
    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// One rendered result: test identity, elapsed time, verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictRecord {
    /// Script file name as reported (e.g. `test01.dsl`).
    pub test: String,
    /// Elapsed client execution time in milliseconds.
    pub elapsed_ms: u64,
    /// The verdict.
    pub verdict: Verdict,
}

/// Truncation marker appended when reason lines were omitted.
pub const TRUNCATION_MARKER: &str = "... failure report truncated";

/// Renders verdict records to the console.
#[derive(Debug, Clone)]
pub struct Reporter {
    /// Timing-only mode: blue FAIL tags and single-line failure reports.
    pub timing_only: bool,
    /// Emit one JSON object per verdict instead of console lines.
    pub json: bool,
    /// Maximum reason lines per failure report in normal mode.
    pub line_cap: usize,
}

impl Reporter {
    /// Build a reporter.
    #[must_use]
    pub const fn new(timing_only: bool, json: bool, line_cap: usize) -> Self {
        Self {
            timing_only,
            json,
            line_cap,
        }
    }

    /// Render a record as console lines (without trailing newlines).
    #[must_use]
    pub fn render_lines(&self, record: &VerdictRecord) -> Vec<String> {
        match &record.verdict {
            Verdict::Pass => vec![format!(
                "[{}] {} in {} ms",
                "PASS".green(),
                record.test,
                record.elapsed_ms
            )],
            Verdict::Warn { advisory } => vec![
                format!(
                    "[{}] {} in {} ms",
                    "WARN".blue(),
                    record.test,
                    record.elapsed_ms
                ),
                String::new(),
                format!("    {advisory}"),
                String::new(),
            ],
            Verdict::Fail { reasons } => {
                // Timing-only runs keep failure noise to a single line.
                let tag = if self.timing_only {
                    "FAIL".blue()
                } else {
                    "FAIL".red()
                };
                let cap = if self.timing_only { 1 } else { self.line_cap };

                let mut lines = vec![
                    format!("[{tag}] {} in {} ms", record.test, record.elapsed_ms),
                    String::new(),
                ];
                for reason in reasons.iter().take(cap) {
                    lines.push(format!("    {reason}"));
                }
                if reasons.len() > cap {
                    lines.push(String::new());
                    lines.push(format!("    {TRUNCATION_MARKER}"));
                }
                lines.push(String::new());
                lines
            }
        }
    }

    /// Print a record to stdout. Never fails; write errors are swallowed so
    /// the run's control flow is unaffected.
    pub fn print(&self, record: &VerdictRecord) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if self.json {
            let value = json!({
                "test": record.test,
                "elapsed_ms": record.elapsed_ms,
                "verdict": record.verdict,
            });
            let _ = writeln!(out, "{value}");
        } else {
            for line in self.render_lines(record) {
                let _ = writeln!(out, "{line}");
            }
        }
        let _ = out.flush();
    }
}
