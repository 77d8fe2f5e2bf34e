//! Shared data models for analyzer findings, settings and run reports.

pub mod diagnostic;
pub mod settings;

pub use diagnostic::{Diagnostic, Severity};

use serde::Serialize;
use std::ops::{Add, AddAssign};
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
/// Number of findings per severity bucket.
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub information: usize,
}

impl SeverityCounts {
    /// Count a file's diagnostics by severity. `Other` severities fall in no bucket.
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let of = |s: Severity| diagnostics.iter().filter(|d| d.severity == s).count();
        SeverityCounts {
            error: of(Severity::Error),
            warning: of(Severity::Warning),
            information: of(Severity::Information),
        }
    }

    pub fn total(&self) -> usize {
        self.error + self.warning + self.information
    }
}

impl Add for SeverityCounts {
    type Output = SeverityCounts;

    fn add(self, rhs: SeverityCounts) -> SeverityCounts {
        SeverityCounts {
            error: self.error + rhs.error,
            warning: self.warning + rhs.warning,
            information: self.information + rhs.information,
        }
    }
}

impl AddAssign for SeverityCounts {
    fn add_assign(&mut self, rhs: SeverityCounts) {
        *self = *self + rhs;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
/// What happened when one file was analyzed.
pub enum FileOutcome {
    Clean,
    Findings {
        diagnostics: Vec<Diagnostic>,
        counts: SeverityCounts,
    },
    EngineError {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
/// Per-file entry of a run.
pub struct FileReport {
    #[serde(skip)]
    pub path: PathBuf,
    /// Path relative to the resolution root, `/`-separated.
    pub file: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    /// Counts contributed to the run totals.
    pub fn counts(&self) -> SeverityCounts {
        match &self.outcome {
            FileOutcome::Findings { counts, .. } => *counts,
            _ => SeverityCounts::default(),
        }
    }

    /// Whether this file forces the run to fail. Any finding of any
    /// severity does, and so does an analyzer error.
    pub fn is_failure(&self) -> bool {
        !matches!(self.outcome, FileOutcome::Clean)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// Result of analyzing a file set; immutable once returned.
pub struct RunResult {
    pub exit_code: i32,
    pub counts: SeverityCounts,
    pub files: Vec<FileReport>,
}

impl RunResult {
    pub fn empty() -> Self {
        RunResult {
            exit_code: 0,
            counts: SeverityCounts::default(),
            files: Vec::new(),
        }
    }

    pub fn engine_errors(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::EngineError { .. }))
            .count()
    }
}
