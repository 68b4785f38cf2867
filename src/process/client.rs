//! One client execution: stream a script to stdin, capture stdout, time it.
//!
//! The script file is handed to the client as its stdin file descriptor
//! directly, so no feeder thread or intermediate process is needed and the
//! harness cannot deadlock on a full stdin pipe while the client floods
//! stdout.

use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::core::errors::{HarnessError, Result};
use crate::process::ProcessState;

/// Record of one client execution.
#[derive(Debug, Clone)]
pub struct TestRun {
    /// Wall-clock time the client was started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock time the client had exited and its output was collected.
    pub finished_at: DateTime<Utc>,
    /// Elapsed duration in milliseconds.
    pub elapsed_ms: u64,
    /// Raw captured stdout bytes.
    pub stdout: Vec<u8>,
    /// Client state once its output stream closed.
    pub client_state: ProcessState,
}

/// Run the client once: spawn with the script as stdin, capture stdout in
/// full, and wait for it to exit.
///
/// This is a synchronous suspension point; the caller does not proceed until
/// the client has fully exited.
pub fn run_client(client_path: &Path, script_path: &Path) -> Result<TestRun> {
    let script = File::open(script_path).map_err(|source| HarnessError::io(script_path, source))?;

    let started_at = Utc::now();
    let clock = Instant::now();

    let child = Command::new(client_path)
        .stdin(Stdio::from(script))
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| HarnessError::Spawn {
            name: "client",
            path: client_path.to_path_buf(),
            source,
        })?;

    let output = child
        .wait_with_output()
        .map_err(|source| HarnessError::io(client_path, source))?;

    let finished_at = Utc::now();
    let elapsed_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(TestRun {
        started_at,
        finished_at,
        elapsed_ms,
        stdout: output.stdout,
        client_state: ProcessState::from_status(Some(output.status)),
    })
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use super::*;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    #[test]
    fn captures_stdout_and_zero_exit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = script(dir.path(), "client", "cat >/dev/null\necho 1");
        let input = dir.path().join("test01.dsl");
        fs::write(&input, "SELECT 1;\n").expect("write input");

        let run = run_client(&client, &input).expect("run");
        assert_eq!(String::from_utf8_lossy(&run.stdout), "1\n");
        assert_eq!(run.client_state, ProcessState::Exited(Some(0)));
        assert!(run.finished_at >= run.started_at);
    }

    #[test]
    fn script_bytes_reach_the_client_stdin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = script(dir.path(), "client", "cat");
        let input = dir.path().join("echo.dsl");
        fs::write(&input, "line one\nline two\n").expect("write input");

        let run = run_client(&client, &input).expect("run");
        assert_eq!(String::from_utf8_lossy(&run.stdout), "line one\nline two\n");
    }

    #[test]
    fn nonzero_exit_is_recorded_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = script(dir.path(), "client", "cat >/dev/null\nexit 7");
        let input = dir.path().join("t.dsl");
        fs::write(&input, "").expect("write input");

        let run = run_client(&client, &input).expect("run");
        assert_eq!(run.client_state, ProcessState::Exited(Some(7)));
    }

    #[test]
    fn missing_script_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = script(dir.path(), "client", "cat");
        let err = run_client(&client, &dir.path().join("absent.dsl")).unwrap_err();
        assert_eq!(err.code(), "RDT-2001");
    }

    #[test]
    fn missing_client_binary_is_spawn_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("t.dsl");
        fs::write(&input, "").expect("write input");
        let err = run_client(Path::new("/nonexistent/client"), &input).unwrap_err();
        assert_eq!(err.code(), "RDT-2002");
    }
}
