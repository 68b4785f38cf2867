//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use rdbms_harness::prelude::*;
//! ```

// Core
pub use crate::core::config::{DatasetTier, HarnessConfig, SuiteConfig};
pub use crate::core::errors::{HarnessError, Result};

// Suite
pub use crate::suite::{TestCase, discover};

// Process
pub use crate::process::{ProcessState, ServerSession, TestRun, lifecycle_failures, run_client};

// Validation
pub use crate::validate::{
    PerfOutcome, PerformanceGate, diff_lines, normalize_client_output, read_reference_lines,
};

// Reporting
pub use crate::report::{Reporter, Verdict, VerdictRecord};

// Runner
pub use crate::runner::{InterruptFlag, RunOptions, RunSummary, Runner};
