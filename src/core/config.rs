//! Harness configuration: TOML file + `RDBMS_DEBUG` env signal + smart defaults.
//!
//! The suite-tuning knobs (grace delay, truncation caps, budget table, ...)
//! live in [`SuiteConfig`], which can be overridden with an optional
//! `rdbms-test.toml` in the project root. The dataset tier — which test
//! directory to use and whether performance checks run — comes from the
//! `RDBMS_DEBUG` environment variable alone.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::errors::{HarnessError, Result};

/// Environment variable selecting the dataset tier.
pub const DEBUG_ENV_VAR: &str = "RDBMS_DEBUG";

/// Name of the optional suite-tuning config file, resolved under the root.
pub const CONFIG_FILE_NAME: &str = "rdbms-test.toml";

/// Dataset tier selected by `RDBMS_DEBUG`.
///
/// Larger tiers carry enough data for timing to be meaningful, so they
/// enable the performance gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DatasetTier {
    /// `RDBMS_DEBUG` unset, `0`, or `1` — the default hand-written suite.
    Small,
    /// `RDBMS_DEBUG=2` — 1M-row generated suite.
    Medium1M,
    /// `RDBMS_DEBUG=3` — 10M-row generated suite.
    Large10M,
    /// `RDBMS_DEBUG=4` — 100M-row generated suite.
    Huge100M,
}

impl DatasetTier {
    /// Parse the tier from an `RDBMS_DEBUG` value. `None` means unset.
    pub fn from_env_value(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("0" | "1") => Ok(Self::Small),
            Some("2") => Ok(Self::Medium1M),
            Some("3") => Ok(Self::Large10M),
            Some("4") => Ok(Self::Huge100M),
            Some(other) => Err(HarnessError::InvalidDebugLevel {
                value: other.to_string(),
            }),
        }
    }

    /// Read the tier from the process environment.
    pub fn from_env() -> Result<Self> {
        let value = env::var(DEBUG_ENV_VAR).ok();
        Self::from_env_value(value.as_deref())
    }

    /// Test-directory name under the project root for this tier.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Small => "project_tests",
            Self::Medium1M => "project_tests_1M",
            Self::Large10M => "project_tests_10M",
            Self::Huge100M => "project_tests_100M",
        }
    }

    /// Whether this tier has enough data for timing checks to be meaningful.
    #[must_use]
    pub const fn perf_enabled(self) -> bool {
        !matches!(self, Self::Small)
    }
}

/// Suite-tuning knobs with defaults matching the established harness behavior.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SuiteConfig {
    /// Extension of input script files (without the dot).
    pub input_extension: String,
    /// Extension of reference output files (without the dot).
    pub reference_extension: String,
    /// Lines in captured client output starting with this prefix are
    /// diagnostic comments, not part of the correctness contract.
    pub comment_prefix: String,
    /// Delay after client exit before sampling server state. The server's
    /// shutdown path is asynchronous and environment-dependent; this is a
    /// heuristic bound, not a correctness guarantee.
    pub grace_delay_ms: u64,
    /// Maximum number of changed lines collected from a diff.
    pub diff_line_cap: usize,
    /// Maximum number of reason lines rendered per failure report.
    pub report_line_cap: usize,
    /// Tests whose correct behavior is to terminate the server.
    pub shutdown_tests: Vec<String>,
    /// Test whose measured duration anchors the performance budgets.
    pub reference_test: String,
    /// Tolerance multiplier applied on top of each computed expectation.
    pub perf_fuzz: f64,
    /// Expected-duration multipliers relative to the reference test.
    pub perf_budgets: HashMap<String, f64>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            input_extension: "dsl".to_string(),
            reference_extension: "exp".to_string(),
            comment_prefix: "--".to_string(),
            grace_delay_ms: 10,
            diff_line_cap: 50,
            report_line_cap: 20,
            shutdown_tests: [
                "test01", "test02", "test10", "test18", "test19", "test24", "test25", "test30",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            reference_test: "test16".to_string(),
            perf_fuzz: 1.2,
            perf_budgets: HashMap::from([("test17".to_string(), 0.5)]),
        }
    }
}

/// Fully resolved harness configuration for one run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// RDBMS project root directory.
    pub root: PathBuf,
    /// Dataset tier from the environment signal.
    pub tier: DatasetTier,
    /// Suite-tuning knobs.
    pub suite: SuiteConfig,
}

impl HarnessConfig {
    /// Resolve the configuration: tier from the environment, suite knobs from
    /// an optional TOML file, then validate that the root, tests directory,
    /// and both project binaries exist.
    ///
    /// A missing config file at the default location is not an error; an
    /// explicitly passed path must exist.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let tier = DatasetTier::from_env()?;
        Self::load_with_tier(root, config_path, tier)
    }

    /// [`Self::load`] with an explicit tier, bypassing the environment.
    pub fn load_with_tier(
        root: &Path,
        config_path: Option<&Path>,
        tier: DatasetTier,
    ) -> Result<Self> {
        let default_path = root.join(CONFIG_FILE_NAME);
        let (path, explicit) =
            config_path.map_or((default_path, false), |p| (p.to_path_buf(), true));

        let suite = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| HarnessError::io(&path, source))?;
            toml::from_str(&raw)?
        } else if explicit {
            return Err(HarnessError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            ));
        } else {
            SuiteConfig::default()
        };

        let config = Self {
            root: root.to_path_buf(),
            tier,
            suite,
        };
        config.validate()?;
        Ok(config)
    }

    /// Directory holding the input scripts and reference outputs for the tier.
    #[must_use]
    pub fn tests_dir(&self) -> PathBuf {
        self.root.join(self.tier.dir_name())
    }

    /// Path of the server binary under test.
    #[must_use]
    pub fn server_path(&self) -> PathBuf {
        self.root.join("src").join("server")
    }

    /// Path of the client binary under test.
    #[must_use]
    pub fn client_path(&self) -> PathBuf {
        self.root.join("src").join("client")
    }

    /// Whether performance checks run for this configuration.
    #[must_use]
    pub const fn perf_enabled(&self) -> bool {
        self.tier.perf_enabled()
    }

    /// Whether the named test is expected to terminate the server.
    #[must_use]
    pub fn is_shutdown_test(&self, name: &str) -> bool {
        self.suite.shutdown_tests.iter().any(|t| t == name)
    }

    /// Grace delay between client exit and server state sampling.
    #[must_use]
    pub const fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.suite.grace_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        if !self.root.exists() {
            return Err(HarnessError::MissingRoot {
                path: self.root.clone(),
            });
        }
        let tests_dir = self.tests_dir();
        if !tests_dir.exists() {
            return Err(HarnessError::MissingTestsDir {
                path: tests_dir,
                tier_dir: self.tier.dir_name().to_string(),
            });
        }
        for (name, path) in [
            ("server", self.server_path()),
            ("client", self.client_path()),
        ] {
            if !path.exists() {
                return Err(HarnessError::MissingBinary { name, path });
            }
        }
        Ok(())
    }
}
