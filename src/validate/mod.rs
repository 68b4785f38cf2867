//! Verdict inputs: output diffing and the relative performance gate.

pub mod diff;
pub mod perf;

pub use diff::{diff_lines, normalize_client_output, read_reference_lines};
pub use perf::{PerfOutcome, PerformanceGate};
