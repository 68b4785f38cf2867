//! Process lifecycle: server session ownership, client execution, and
//! exit-state checks.
//!
//! The sequencing controller owns the server; this module only observes its
//! state when checking lifecycle invariants.

use std::process::ExitStatus;

pub mod client;
pub mod server;

pub use client::{TestRun, run_client};
pub use server::ServerSession;

/// Observed state of a child process at a sampling point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// The process has not exited yet.
    Running,
    /// The process exited; the code is absent when it was killed by a signal.
    Exited(Option<i32>),
}

impl ProcessState {
    /// Build from a `try_wait`-style sample.
    #[must_use]
    pub fn from_status(status: Option<ExitStatus>) -> Self {
        status.map_or(Self::Running, |s| Self::Exited(s.code()))
    }

    /// Whether the process was still alive at sampling time.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Evaluate every exit-state invariant for one completed test.
///
/// All checks run independently; each violation yields its own distinct
/// diagnostic. The caller decides whether the first or the full set is
/// rendered.
#[must_use]
pub fn lifecycle_failures(
    is_shutdown_test: bool,
    server: ProcessState,
    client: ProcessState,
) -> Vec<String> {
    let mut failures = Vec::new();

    if is_shutdown_test {
        if server.is_running() {
            failures.push("Server should have shut down, but did not".to_string());
        }
    } else if !server.is_running() {
        failures.push("Server shut down, but should not have".to_string());
    }

    match client {
        ProcessState::Running => {
            failures.push("Client should have shut down, but did not".to_string());
        }
        ProcessState::Exited(Some(0)) => {}
        ProcessState::Exited(Some(code)) => {
            failures.push(format!("Client exited with code {code}"));
        }
        ProcessState::Exited(None) => {
            failures.push("Client was terminated by a signal".to_string());
        }
    }

    match server {
        ProcessState::Running | ProcessState::Exited(Some(0)) => {}
        ProcessState::Exited(Some(code)) => {
            failures.push(format!("Server exited with code {code}"));
        }
        ProcessState::Exited(None) => {
            failures.push("Server was terminated by a signal".to_string());
        }
    }

    failures
}
