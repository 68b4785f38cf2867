//! Test-case discovery: scan the tier's test directory for input scripts.
//!
//! Discovery happens once at startup. The lexicographic sort of base names
//! is the execution order, so a fixed directory content set always yields
//! the same sequence.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::SuiteConfig;
use crate::core::errors::{HarnessError, Result};

/// A named pairing of an input script and its expected reference output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// 1-based position in the sorted full test set.
    pub ordinal: usize,
    /// Base name shared by the script and reference files (e.g. `test01`).
    pub name: String,
    /// Input script streamed to the client's stdin.
    pub script_path: PathBuf,
    /// Expected output, one line per line.
    pub reference_path: PathBuf,
}

impl TestCase {
    /// Script file name as shown in reports (e.g. `test01.dsl`).
    #[must_use]
    pub fn script_file_name(&self) -> String {
        self.script_path
            .file_name()
            .map_or_else(|| self.name.clone(), |n| n.to_string_lossy().into_owned())
    }
}

/// Discover all test cases in `tests_dir`, sorted by base name.
///
/// A file is a test case iff its extension matches the configured input
/// extension. The matching reference file is *not* required to exist here;
/// its absence is a fatal error at execution time, after the test has run.
pub fn discover(tests_dir: &Path, suite: &SuiteConfig) -> Result<Vec<TestCase>> {
    let entries = fs::read_dir(tests_dir).map_err(|source| HarnessError::io(tests_dir, source))?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| HarnessError::io(tests_dir, source))?;
        let path = entry.path();
        let is_script = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy() == suite.input_extension.as_str());
        if !is_script {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            names.push(stem.to_string_lossy().into_owned());
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| TestCase {
            ordinal: i + 1,
            script_path: tests_dir.join(format!("{name}.{}", suite.input_extension)),
            reference_path: tests_dir.join(format!("{name}.{}", suite.reference_extension)),
            name,
        })
        .collect())
}
