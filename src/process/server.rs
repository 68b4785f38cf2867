//! The long-lived server session shared across a run of tests.
//!
//! At most one session is alive at any time. The sequencing controller owns
//! the handle and is the only component that spawns or kills it; dropping
//! the handle force-kills the process, so the server cannot outlive the
//! harness on any exit path (normal completion, fail-fast halt, or a fatal
//! configuration error unwinding out of the run loop).

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::core::errors::{HarnessError, Result};
use crate::process::ProcessState;

/// Owned handle to the running server process.
#[derive(Debug)]
pub struct ServerSession {
    child: Child,
    path: PathBuf,
}

impl ServerSession {
    /// Spawn the server with no arguments.
    ///
    /// The server's stdout is discarded: the harness observes the server
    /// only through its liveness and exit code, and piping output nobody
    /// reads would eventually stall the server on a full pipe.
    pub fn spawn(server_path: &Path) -> Result<Self> {
        let child = Command::new(server_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                name: "server",
                path: server_path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            child,
            path: server_path.to_path_buf(),
        })
    }

    /// Sample the server's state without blocking.
    pub fn state(&mut self) -> ProcessState {
        match self.child.try_wait() {
            Ok(status) => ProcessState::from_status(status),
            // A failed sample proves nothing about exit, so report Running
            // and let the next sample decide.
            Err(_) => ProcessState::Running,
        }
    }

    /// Whether the server was still alive at the last sample.
    pub fn is_running(&mut self) -> bool {
        self.state().is_running()
    }

    /// Path the session was spawned from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Force-terminate the server and reap it.
    pub fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for ServerSession {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    #[test]
    fn spawned_server_is_running() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = script(dir.path(), "server", "sleep 30");
        let mut session = ServerSession::spawn(&path).expect("spawn");
        assert!(session.is_running());
        session.kill();
        assert!(!session.is_running());
    }

    #[test]
    fn exited_server_reports_code() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = script(dir.path(), "server", "exit 3");
        let mut session = ServerSession::spawn(&path).expect("spawn");
        // Wait for the short-lived process to finish.
        let status = session.child.wait().expect("wait");
        assert_eq!(status.code(), Some(3));
        assert_eq!(session.state(), ProcessState::Exited(Some(3)));
    }

    #[test]
    fn kill_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = script(dir.path(), "server", "sleep 30");
        let mut session = ServerSession::spawn(&path).expect("spawn");
        session.kill();
        session.kill();
        assert!(!session.is_running());
    }

    #[test]
    fn spawn_of_missing_binary_fails() {
        let err = ServerSession::spawn(Path::new("/nonexistent/server")).unwrap_err();
        assert_eq!(err.code(), "RDT-2002");
    }
}
