//! Relative performance gate: budget checks keyed to a reference test.
//!
//! The gate never compares against absolute wall-clock numbers. One
//! designated reference test establishes a baseline on the same machine in
//! the same run, and budget-tracked tests must finish within a multiple of
//! that baseline, scaled by a fuzz tolerance.

use std::collections::HashMap;

use crate::core::config::SuiteConfig;

/// Outcome of a performance check for one completed test run.
#[derive(Debug, Clone, PartialEq)]
pub enum PerfOutcome {
    /// Not budget-tracked, within budget, or no baseline yet.
    Ok,
    /// Measured duration exceeded the fuzz-scaled budget.
    Exceeded {
        /// The computed bound in milliseconds (baseline × multiplier × fuzz).
        bound_ms: u64,
        /// Human-readable diagnostic naming the bound, the reference test,
        /// and the probable root cause.
        reason: String,
    },
    /// Budget-tracked but performance checking is disabled for this run.
    Skipped {
        /// Advisory shown instead of a plain Pass.
        advisory: String,
    },
}

/// Tracks the reference baseline and validates budget-tracked tests.
#[derive(Debug, Clone)]
pub struct PerformanceGate {
    enabled: bool,
    reference_test: String,
    fuzz: f64,
    budgets: HashMap<String, f64>,
    baseline_ms: Option<u64>,
}

impl PerformanceGate {
    /// Build a gate from the suite config.
    #[must_use]
    pub fn new(suite: &SuiteConfig, enabled: bool) -> Self {
        Self {
            enabled,
            reference_test: suite.reference_test.clone(),
            fuzz: suite.perf_fuzz,
            budgets: suite.perf_budgets.clone(),
            baseline_ms: None,
        }
    }

    /// Record a completed run. A run of the reference test overwrites the
    /// baseline; only the most recent reference run counts.
    pub fn observe(&mut self, test_name: &str, elapsed_ms: u64) {
        if test_name == self.reference_test {
            self.baseline_ms = Some(elapsed_ms);
        }
    }

    /// Current baseline, if the reference test has run.
    #[must_use]
    pub const fn baseline_ms(&self) -> Option<u64> {
        self.baseline_ms
    }

    /// Validate a completed run against its budget, if it has one.
    ///
    /// Checking before the reference test has run is a no-op.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn check(&self, test_name: &str, elapsed_ms: u64) -> PerfOutcome {
        let Some(&multiplier) = self.budgets.get(test_name) else {
            return PerfOutcome::Ok;
        };

        if !self.enabled {
            return PerfOutcome::Skipped {
                advisory: "This is a performance test, but performance tests are not running. \
                           See \"WARNING\" message at top of output."
                    .to_string(),
            };
        }

        let Some(baseline_ms) = self.baseline_ms else {
            return PerfOutcome::Ok;
        };

        let bound = baseline_ms as f64 * multiplier * self.fuzz;
        if elapsed_ms as f64 > bound {
            let bound_ms = bound.floor() as u64;
            return PerfOutcome::Exceeded {
                bound_ms,
                reason: format!(
                    "Expected to take {bound_ms} ms at most ({} * {multiplier:.2}, fuzz {:.2}); \
                     did you implement parallel scanning?",
                    self.reference_test, self.fuzz
                ),
            };
        }

        PerfOutcome::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(enabled: bool) -> PerformanceGate {
        PerformanceGate::new(&SuiteConfig::default(), enabled)
    }

    #[test]
    fn untracked_test_is_always_ok() {
        let mut g = gate(true);
        g.observe("test16", 1_000);
        assert_eq!(g.check("test05", 999_999), PerfOutcome::Ok);
    }

    #[test]
    fn check_before_baseline_is_a_noop() {
        let g = gate(true);
        assert!(g.baseline_ms().is_none());
        assert_eq!(g.check("test17", 999_999), PerfOutcome::Ok);
    }

    #[test]
    fn within_budget_passes() {
        // Baseline 1000ms, default multiplier for test17 is 0.5, fuzz 1.2:
        // bound = 600ms.
        let mut g = gate(true);
        g.observe("test16", 1_000);
        assert_eq!(g.check("test17", 600), PerfOutcome::Ok);
        assert_eq!(g.check("test17", 599), PerfOutcome::Ok);
    }

    #[test]
    fn over_budget_reports_the_fuzz_scaled_bound() {
        let mut suite = SuiteConfig::default();
        suite.perf_budgets.insert("test17".to_string(), 2.0);
        let mut g = PerformanceGate::new(&suite, true);
        g.observe("test16", 1_000);

        // 1000 * 2.0 * 1.2 = 2400: 2300 passes, 2500 fails naming 2400.
        assert_eq!(g.check("test17", 2_300), PerfOutcome::Ok);
        match g.check("test17", 2_500) {
            PerfOutcome::Exceeded { bound_ms, reason } => {
                assert_eq!(bound_ms, 2_400);
                assert!(reason.contains("2400"), "reason must name the bound: {reason}");
                assert!(reason.contains("test16"), "reason must name the reference: {reason}");
                assert!(
                    reason.contains("parallel scanning"),
                    "reason must carry the diagnostic hint: {reason}"
                );
            }
            other => panic!("expected Exceeded, got {other:?}"),
        }
    }

    #[test]
    fn disabled_gate_downgrades_to_advisory() {
        let mut g = gate(false);
        g.observe("test16", 1_000);
        match g.check("test17", 1) {
            PerfOutcome::Skipped { advisory } => {
                assert!(advisory.contains("performance tests are not running"));
            }
            other => panic!("expected Skipped, got {other:?}"),
        }
    }

    #[test]
    fn rerunning_reference_overwrites_baseline() {
        let mut g = gate(true);
        g.observe("test16", 1_000);
        g.observe("test16", 100);
        assert_eq!(g.baseline_ms(), Some(100));
        // Bound is now 100 * 0.5 * 1.2 = 60ms.
        assert!(matches!(g.check("test17", 61), PerfOutcome::Exceeded { .. }));
    }

    #[test]
    fn non_reference_tests_do_not_touch_baseline() {
        let mut g = gate(true);
        g.observe("test17", 5_000);
        assert!(g.baseline_ms().is_none());
    }
}
