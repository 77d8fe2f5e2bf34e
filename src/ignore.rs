//! Ignore file: extra exclude patterns, one per line.

use std::fs;
use std::io;
use std::path::Path;

/// Read exclude patterns from `path`.
///
/// Returns `Ok(None)` when the file does not exist. Lines are taken verbatim
/// apart from their terminator; empty lines are skipped because an empty
/// pattern would exclude every file.
pub fn read_ignore_file(path: &Path) -> io::Result<Option<Vec<String>>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(parse_ignore_lines(&text)))
}

pub fn parse_ignore_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Explicit excludes first, then the ignore file's patterns.
pub fn merge_excludes(explicit: &[String], from_file: Option<Vec<String>>) -> Vec<String> {
    let mut out = explicit.to_vec();
    out.extend(from_file.unwrap_or_default());
    out
}
