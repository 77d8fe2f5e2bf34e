//! File selection: recursive discovery of script files plus include/exclude
//! filtering.
//!
//! Discovery walks `<dir>/**/*` and keeps regular files whose extension is
//! on the allow-list. Hidden entries (names starting with `.`) below the root
//! are skipped, so `.git` and similar are never scanned. Results are sorted so repeated runs over the same tree
//! produce the same order.

use crate::error::PathResolutionError;
use crate::pattern::{any_matches, compile_all, PathPattern};
use glob::{glob_with, MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Script extensions analyzed when the configuration does not override them.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["ps1", "psm1", "psd1"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Include/exclude patterns for one selection.
pub struct FilterCriteria {
    /// `None` includes everything; `Some(vec![])` includes nothing.
    pub includes: Option<Vec<String>>,
    pub excludes: Vec<String>,
}

/// Compiled form of `FilterCriteria`.
struct Filter {
    includes: Option<Vec<PathPattern>>,
    excludes: Vec<PathPattern>,
}

impl Filter {
    fn new(criteria: &FilterCriteria) -> Self {
        Filter {
            includes: criteria.includes.as_ref().map(|i| compile_all(i.as_slice())),
            excludes: compile_all(criteria.excludes.as_slice()),
        }
    }

    /// Exclusion always wins over inclusion.
    fn accepts(&self, path: &str) -> bool {
        let included = match &self.includes {
            None => true,
            Some(pats) => any_matches(pats, path),
        };
        included && !any_matches(&self.excludes, path)
    }
}

/// Resolve `directory` to an absolute, existing path.
pub fn resolve_dir(directory: &Path) -> Result<PathBuf, PathResolutionError> {
    fs::canonicalize(directory).map_err(|source| PathResolutionError {
        path: directory.to_path_buf(),
        source,
    })
}

/// List script files under `directory` that pass `criteria`.
///
/// Returned paths are absolute and sorted.
pub fn select_files<S: AsRef<str>>(
    directory: &Path,
    criteria: &FilterCriteria,
    extensions: &[S],
) -> Result<Vec<PathBuf>, PathResolutionError> {
    let root = resolve_dir(directory)?;
    if matches!(&criteria.includes, Some(i) if i.is_empty()) {
        debug!("empty include list; selecting nothing");
        return Ok(Vec::new());
    }
    let filter = Filter::new(criteria);
    let files: Vec<PathBuf> = discover(&root, extensions)
        .into_iter()
        .filter(|p| filter.accepts(&p.to_string_lossy()))
        .collect();
    debug!("selected {} file(s) under {}", files.len(), root.display());
    Ok(files)
}

/// Every file below `root` whose extension is in `extensions` (case-insensitive).
fn discover<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Vec<PathBuf> {
    let base = Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/*", base.trim_end_matches(['/', '\\']));
    let opts = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let entries = match glob_with(&pattern, opts) {
        Ok(paths) => paths,
        Err(e) => {
            warn!("cannot walk {}: {}", root.display(), e);
            return Vec::new();
        }
    };
    let mut out: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("skipping unreadable path {}: {}", e.path().display(), e.error());
                None
            }
        })
        .filter(|p| p.is_file() && has_extension(p, extensions))
        .collect();
    out.sort();
    out
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|allowed| allowed.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}
