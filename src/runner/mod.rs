//! Sequencing controller: owns the server lifecycle across tests, drives
//! each test through execution and validation, and decides continue/stop.
//!
//! Tests run strictly sequentially. The server session is the only shared
//! resource; it is held as loop state, passed explicitly through each
//! iteration, and its drop guard guarantees the server dies with the
//! harness on every exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use signal_hook::consts::{SIGINT, SIGTERM};

use crate::core::config::HarnessConfig;
use crate::core::errors::{HarnessError, Result};
use crate::process::{ServerSession, lifecycle_failures, run_client};
use crate::report::{Reporter, Verdict, VerdictRecord};
use crate::suite::TestCase;
use crate::validate::{
    PerfOutcome, PerformanceGate, diff_lines, normalize_client_output, read_reference_lines,
};

/// Options selecting which tests run and how failures are handled.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// First ordinal to execute (inclusive).
    pub start: usize,
    /// Last ordinal to execute (inclusive); `None` means through the end.
    pub end: Option<usize>,
    /// Continue past failures with truncated reports.
    pub timing_only: bool,
    /// Emit JSON verdict records instead of console lines.
    pub json: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            start: 1,
            end: None,
            timing_only: false,
            json: false,
        }
    }
}

/// Aggregate result of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of tests executed.
    pub executed: usize,
    /// Number of tests that produced at least one Fail verdict.
    pub failed_tests: usize,
    /// Whether the run halted early on a Fail (fail-fast mode).
    pub halted: bool,
    /// Whether the run stopped on an interrupt signal.
    pub interrupted: bool,
    /// Every rendered verdict, in order.
    pub records: Vec<VerdictRecord>,
}

impl RunSummary {
    /// Whether the run completed cleanly with no failures.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed_tests == 0 && !self.halted && !self.interrupted
    }
}

/// Interrupt flag polled between tests.
///
/// SIGINT/SIGTERM set the flag; the in-flight client still runs to
/// completion, then the loop stops and the server session's drop guard
/// kills the server.
#[derive(Debug, Clone)]
pub struct InterruptFlag {
    stop_flag: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Create the flag and register OS signal hooks.
    ///
    /// Registration is best-effort; failures are logged to stderr but not
    /// fatal.
    pub fn new() -> Self {
        let flag = Self {
            stop_flag: Arc::new(AtomicBool::new(false)),
        };
        for signal in [SIGINT, SIGTERM] {
            if let Err(e) = signal_hook::flag::register(signal, Arc::clone(&flag.stop_flag)) {
                eprintln!("[RDT-SIGNAL] failed to register signal {signal}: {e}");
            }
        }
        flag
    }

    /// Whether a stop has been requested.
    pub fn should_stop(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    /// Programmatically request a stop.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }
}

impl Default for InterruptFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a test ordinal is selected by the `[start, end]` range.
///
/// The first test in the full set always runs: it creates the database the
/// later tests depend on.
#[must_use]
pub const fn in_range(ordinal: usize, start: usize, end: Option<usize>) -> bool {
    if ordinal == 1 {
        return true;
    }
    let within_end = match end {
        Some(e) => ordinal <= e,
        None => true,
    };
    ordinal >= start && within_end
}

/// Drives an ordered test set to completion.
pub struct Runner<'a> {
    config: &'a HarnessConfig,
    options: RunOptions,
    gate: PerformanceGate,
    reporter: Reporter,
    interrupt: InterruptFlag,
}

impl<'a> Runner<'a> {
    /// Build a runner; registers interrupt hooks.
    #[must_use]
    pub fn new(config: &'a HarnessConfig, options: RunOptions) -> Self {
        let gate = PerformanceGate::new(&config.suite, config.perf_enabled());
        let reporter = Reporter::new(options.timing_only, options.json, config.suite.report_line_cap);
        Self {
            config,
            options,
            gate,
            reporter,
            interrupt: InterruptFlag::new(),
        }
    }

    /// Replace the interrupt flag (shared with an outer supervisor).
    pub fn set_interrupt(&mut self, interrupt: InterruptFlag) {
        self.interrupt = interrupt;
    }

    /// Execute every in-range test, rendering verdicts as they resolve.
    ///
    /// Returns `Err` only for fatal configuration errors; test failures are
    /// recorded in the summary. The server (if spawned) is killed before
    /// this returns, on success and error paths alike.
    pub fn run(&mut self, tests: &[TestCase]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut server: Option<ServerSession> = None;

        for test in tests {
            if self.interrupt.should_stop() {
                summary.interrupted = true;
                break;
            }
            if !in_range(test.ordinal, self.options.start, self.options.end) {
                continue;
            }

            // Spawn lazily: only when no session is alive. A shutdown test
            // leaves the previous session exited, so the next test gets a
            // fresh server.
            let mut session = match server.take() {
                Some(mut s) => {
                    if s.is_running() {
                        s
                    } else {
                        ServerSession::spawn(&self.config.server_path())?
                    }
                }
                None => ServerSession::spawn(&self.config.server_path())?,
            };

            let run = run_client(&self.config.client_path(), &test.script_path)?;
            summary.executed += 1;

            self.gate.observe(&test.name, run.elapsed_ms);
            let perf = self.gate.check(&test.name, run.elapsed_ms);

            // The server's post-client shutdown is asynchronous; give it a
            // bounded moment before sampling.
            thread::sleep(self.config.grace_delay());
            let server_state = session.state();
            server = Some(session);

            // A missing reference file means the suite itself is malformed.
            if !test.reference_path.exists() {
                return Err(HarnessError::MissingReference {
                    test: test.name.clone(),
                    path: test.reference_path.clone(),
                });
            }
            let reference = read_reference_lines(&test.reference_path)?;
            let actual =
                normalize_client_output(&run.stdout, &self.config.suite.comment_prefix);
            let diff = diff_lines(&reference, &actual, self.config.suite.diff_line_cap);

            // Every check class is evaluated independently; rendering order
            // is perf, lifecycle, content.
            let mut failures: Vec<Vec<String>> = Vec::new();
            if let PerfOutcome::Exceeded { reason, .. } = &perf {
                failures.push(vec![reason.clone()]);
            }
            for violation in lifecycle_failures(
                self.config.is_shutdown_test(&test.name),
                server_state,
                run.client_state,
            ) {
                failures.push(vec![violation]);
            }
            if !diff.is_empty() {
                failures.push(diff);
            }

            if failures.is_empty() {
                let verdict = match perf {
                    PerfOutcome::Skipped { advisory } => Verdict::Warn { advisory },
                    _ => Verdict::Pass,
                };
                self.emit(&mut summary, test, run.elapsed_ms, verdict);
                continue;
            }

            summary.failed_tests += 1;
            for reasons in failures {
                self.emit(&mut summary, test, run.elapsed_ms, Verdict::Fail { reasons });
                if !self.options.timing_only {
                    summary.halted = true;
                    return Ok(summary);
                }
            }
        }

        Ok(summary)
    }

    fn emit(&self, summary: &mut RunSummary, test: &TestCase, elapsed_ms: u64, verdict: Verdict) {
        let record = VerdictRecord {
            test: test.script_file_name(),
            elapsed_ms,
            verdict,
        };
        self.reporter.print(&record);
        summary.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_ordinal_always_in_range() {
        assert!(in_range(1, 5, Some(9)));
        assert!(in_range(1, 1, Some(1)));
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        assert!(in_range(5, 5, Some(9)));
        assert!(in_range(9, 5, Some(9)));
        assert!(!in_range(4, 5, Some(9)));
        assert!(!in_range(10, 5, Some(9)));
    }

    #[test]
    fn open_end_selects_everything_past_start() {
        assert!(in_range(1_000, 2, None));
        assert!(!in_range(1_000, 2_000, None));
    }

    #[test]
    fn interrupt_flag_is_shared_across_clones() {
        let flag = InterruptFlag {
            stop_flag: Arc::new(AtomicBool::new(false)),
        };
        let clone = flag.clone();
        assert!(!clone.should_stop());
        flag.request_stop();
        assert!(clone.should_stop());
    }

    #[test]
    fn summary_cleanliness() {
        let clean = RunSummary::default();
        assert!(clean.is_clean());

        let halted = RunSummary {
            failed_tests: 1,
            halted: true,
            ..RunSummary::default()
        };
        assert!(!halted.is_clean());

        let interrupted = RunSummary {
            interrupted: true,
            ..RunSummary::default()
        };
        assert!(!interrupted.is_clean());
    }
}
