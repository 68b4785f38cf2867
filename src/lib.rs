#![forbid(unsafe_code)]

//! rdbms-test — black-box conformance and performance harness for a
//! client/server RDBMS.
//!
//! The database itself is an external collaborator, reached only as two
//! executables observed through stdin/stdout bytes and exit codes. The
//! harness sequences test cases, manages the server/client pair's
//! lifecycle per test, diffs captured output against reference files, and
//! enforces relative performance budgets.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use rdbms_harness::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use rdbms_harness::core::config::HarnessConfig;
//! use rdbms_harness::runner::{RunOptions, Runner};
//! ```

pub mod prelude;

pub mod core;
pub mod process;
pub mod report;
pub mod runner;
pub mod suite;
pub mod validate;
