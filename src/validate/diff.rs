//! Output validation: comment stripping and bounded zero-context line diffs.
//!
//! Everything here is a pure function from line sequences to diff lines, so
//! correctness checking is testable without spawning a process. Comparison
//! is order-sensitive and line-exact: trailing whitespace and blank lines
//! are significant.

use std::fs;
use std::path::Path;

use similar::{Algorithm, ChangeTag, capture_diff_slices};

use crate::core::errors::{HarnessError, Result};

/// Split raw client stdout into lines, dropping diagnostic comment lines.
///
/// Only *actual* output is stripped; reference lines starting with the
/// comment prefix are still compared literally.
#[must_use]
pub fn normalize_client_output(raw: &[u8], comment_prefix: &str) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .filter(|line| !line.starts_with(comment_prefix))
        .map(ToString::to_string)
        .collect()
}

/// Read a reference output file as lines with terminators stripped.
pub fn read_reference_lines(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|source| HarnessError::io(path, source))?;
    Ok(raw.lines().map(ToString::to_string).collect())
}

/// Zero-context line diff between expected and actual, as `-`/`+` prefixed
/// changed lines with no file or hunk headers.
///
/// An empty result means the sequences are equal. At most `cap` lines are
/// collected; anything beyond is truncated silently.
#[must_use]
pub fn diff_lines(expected: &[String], actual: &[String], cap: usize) -> Vec<String> {
    let ops = capture_diff_slices(Algorithm::Myers, expected, actual);

    let mut lines = Vec::new();
    'ops: for op in &ops {
        for change in op.iter_changes(expected, actual) {
            let sign = match change.tag() {
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
                ChangeTag::Equal => continue,
            };
            lines.push(format!("{sign}{}", change.value()));
            if lines.len() >= cap {
                break 'ops;
            }
        }
    }
    lines
}
