//! RDT-prefixed error types with structured error codes.
//!
//! Every fatal harness condition is a configuration error: it aborts the
//! whole run with remediation guidance. Per-test failures are never errors;
//! they are [`crate::report::Verdict`] values.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Top-level error type for the RDBMS test harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("[RDT-1001] project root {path} does not exist")]
    MissingRoot { path: PathBuf },

    #[error("[RDT-1002] tests directory {path} does not exist")]
    MissingTestsDir { path: PathBuf, tier_dir: String },

    #[error("[RDT-1003] project binary \"{name}\" at {path} does not exist")]
    MissingBinary { name: &'static str, path: PathBuf },

    #[error("[RDT-1004] `RDBMS_DEBUG` must be a number from 0-4 or be unset (currently {value})")]
    InvalidDebugLevel { value: String },

    #[error("[RDT-1005] test \"{test}\" at {path} has no matching reference output file")]
    MissingReference { test: String, path: PathBuf },

    #[error("[RDT-1006] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[RDT-2001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[RDT-2002] failed to spawn \"{name}\" from {path}: {source}")]
    Spawn {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingRoot { .. } => "RDT-1001",
            Self::MissingTestsDir { .. } => "RDT-1002",
            Self::MissingBinary { .. } => "RDT-1003",
            Self::InvalidDebugLevel { .. } => "RDT-1004",
            Self::MissingReference { .. } => "RDT-1005",
            Self::ConfigParse { .. } => "RDT-1006",
            Self::Io { .. } => "RDT-2001",
            Self::Spawn { .. } => "RDT-2002",
        }
    }

    /// Actionable remediation lines for the user, printed after the error
    /// message on fatal exit.
    #[must_use]
    pub fn remediation(&self) -> Vec<String> {
        match self {
            Self::MissingRoot { .. } => vec![
                "Possible reasons for this:".to_string(),
                "    1) You are not running this tool from the RDBMS project root directory."
                    .to_string(),
                "    2) Your path argument directory is set incorrectly.".to_string(),
                "    3) You have not checked out your code on this machine.".to_string(),
                "Please fix the problem and try again.".to_string(),
            ],
            Self::MissingTestsDir { tier_dir, .. } => vec![
                "Possible reasons for this:".to_string(),
                "    1) You are not running this tool from the RDBMS project root directory."
                    .to_string(),
                "    2) Your path argument directory is set incorrectly.".to_string(),
                "    3) Your `RDBMS_DEBUG` setting is configured incorrectly (try a different number from 0-4)."
                    .to_string(),
                format!(
                    "    4) You have not created a directory called {tier_dir} in your RDBMS project root directory."
                ),
                "Please fix the problem and try again.".to_string(),
            ],
            Self::MissingBinary { .. } | Self::Spawn { .. } => vec![
                "Possible reasons for this:".to_string(),
                "    1) You have not compiled the binary.".to_string(),
                "    2) There was a compilation error the last time you built your project."
                    .to_string(),
                "    3) You are not running this tool from the RDBMS project root directory."
                    .to_string(),
                "    4) Your path argument directory is set incorrectly.".to_string(),
                "Please fix the problem and try again.".to_string(),
            ],
            Self::InvalidDebugLevel { .. } => vec![
                "Unset `RDBMS_DEBUG` or set it to one of: 0, 1, 2, 3, 4.".to_string(),
                "Please fix the problem and try again.".to_string(),
            ],
            Self::MissingReference { .. } => {
                vec!["Please fix this problem and try again.".to_string()]
            }
            Self::ConfigParse { .. } | Self::Io { .. } => {
                vec!["Please fix the problem and try again.".to_string()]
            }
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<toml::de::Error> for HarnessError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<HarnessError> {
        vec![
            HarnessError::MissingRoot {
                path: PathBuf::new(),
            },
            HarnessError::MissingTestsDir {
                path: PathBuf::new(),
                tier_dir: "project_tests".to_string(),
            },
            HarnessError::MissingBinary {
                name: "server",
                path: PathBuf::new(),
            },
            HarnessError::InvalidDebugLevel {
                value: "9".to_string(),
            },
            HarnessError::MissingReference {
                test: "test01".to_string(),
                path: PathBuf::new(),
            },
            HarnessError::ConfigParse {
                context: "toml",
                details: String::new(),
            },
            HarnessError::Io {
                path: PathBuf::new(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "test"),
            },
            HarnessError::Spawn {
                name: "client",
                path: PathBuf::new(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "test"),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let codes: Vec<&str> = all_variants().iter().map(HarnessError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn error_codes_have_rdt_prefix() {
        for err in &all_variants() {
            assert!(
                err.code().starts_with("RDT-"),
                "code {} must start with RDT-",
                err.code()
            );
        }
    }

    #[test]
    fn error_display_includes_code() {
        let err = HarnessError::MissingBinary {
            name: "server",
            path: PathBuf::from("/proj/src/server"),
        };
        let msg = err.to_string();
        assert!(msg.contains("RDT-1003"), "display should contain code: {msg}");
        assert!(
            msg.contains("/proj/src/server"),
            "display should contain path: {msg}"
        );
    }

    #[test]
    fn every_error_has_remediation() {
        for err in &all_variants() {
            assert!(
                !err.remediation().is_empty(),
                "{} must carry remediation text",
                err.code()
            );
        }
    }

    #[test]
    fn tests_dir_remediation_names_the_tier_directory() {
        let err = HarnessError::MissingTestsDir {
            path: PathBuf::from("/proj/project_tests_1M"),
            tier_dir: "project_tests_1M".to_string(),
        };
        assert!(
            err.remediation()
                .iter()
                .any(|line| line.contains("project_tests_1M")),
            "remediation should name the missing tier directory"
        );
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: HarnessError = toml_err.into();
        assert_eq!(err.code(), "RDT-1006");
    }
}
