//! Analysis runner: analyze files one at a time and fold the per-file
//! outcomes into a `RunResult`.
//!
//! A failing analyzer invocation never stops the loop; it is recorded as an
//! engine error and marks the run as failed. Any diagnostic, whatever its
//! severity, also marks the run as failed.

use crate::analyzer::{AnalyzeRequest, Analyzer};
use crate::models::{FileOutcome, FileReport, RunResult, SeverityCounts};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Progress hooks called around each analyzed file.
pub trait RunObserver {
    fn file_started(&mut self, _display_path: &str) {}
    fn file_finished(&mut self, _report: &FileReport) {}
}

/// Silent observer.
impl RunObserver for () {}

/// Path shown for `path`: relative to `root` when possible, `/`-separated.
pub fn display_path(path: &Path, root: &Path) -> String {
    let rel: PathBuf = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    rel.to_string_lossy().replace('\\', "/")
}

/// Analyze one file and classify the result.
pub fn analyze_file(
    path: &Path,
    root: &Path,
    analyzer: &dyn Analyzer,
    request: &AnalyzeRequest<'_>,
) -> FileReport {
    let outcome = match analyzer.analyze(path, request) {
        Err(e) => {
            warn!("analyzer failed on {}: {}", path.display(), e);
            FileOutcome::EngineError {
                message: e.to_string(),
            }
        }
        Ok(diagnostics) if diagnostics.is_empty() => FileOutcome::Clean,
        Ok(diagnostics) => {
            let counts = SeverityCounts::from_diagnostics(&diagnostics);
            FileOutcome::Findings {
                diagnostics,
                counts,
            }
        }
    };
    FileReport {
        path: path.to_path_buf(),
        file: display_path(path, root),
        outcome,
    }
}

/// Fold per-file reports into run totals and an exit code.
pub fn aggregate(files: Vec<FileReport>) -> RunResult {
    let (counts, failed) = files
        .iter()
        .fold((SeverityCounts::default(), false), |(counts, failed), f| {
            (counts + f.counts(), failed || f.is_failure())
        });
    RunResult {
        exit_code: if failed { 1 } else { 0 },
        counts,
        files,
    }
}

/// Analyze `files` in order.
///
/// `root` is the resolution root used for display paths. The observer sees
/// each file before and after it is analyzed.
pub fn run_analysis(
    files: &[PathBuf],
    root: &Path,
    analyzer: &dyn Analyzer,
    request: &AnalyzeRequest<'_>,
    observer: &mut dyn RunObserver,
) -> RunResult {
    debug!(
        "analyzing {} file(s) (fix={}, settings={})",
        files.len(),
        request.fix,
        request.settings.is_some()
    );
    let reports: Vec<FileReport> = files
        .iter()
        .map(|path| {
            observer.file_started(&display_path(path, root));
            let report = analyze_file(path, root, analyzer, request);
            observer.file_finished(&report);
            report
        })
        .collect();
    aggregate(reports)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::analyzer::{AnalyzeRequest, Analyzer};
    use crate::error::AnalyzerError;
    use crate::models::{Diagnostic, Severity};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// Scripted analyzer keyed by file name.
    #[derive(Default)]
    pub struct FakeAnalyzer {
        pub responses: HashMap<String, Result<Vec<Severity>, String>>,
        pub calls: RefCell<Vec<(PathBuf, bool, bool)>>,
    }

    impl FakeAnalyzer {
        pub fn with(mut self, name: &str, response: Result<Vec<Severity>, String>) -> Self {
            self.responses.insert(name.to_string(), response);
            self
        }
    }

    impl Analyzer for FakeAnalyzer {
        fn analyze(
            &self,
            path: &Path,
            request: &AnalyzeRequest<'_>,
        ) -> Result<Vec<Diagnostic>, AnalyzerError> {
            self.calls
                .borrow_mut()
                .push((path.to_path_buf(), request.fix, request.settings.is_some()));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match self.responses.get(&name) {
                None => Ok(Vec::new()),
                Some(Ok(sevs)) => Ok(sevs
                    .iter()
                    .map(|s| Diagnostic::new(s.clone(), format!("{} finding", s)))
                    .collect()),
                Some(Err(msg)) => Err(AnalyzerError::Parse(msg.clone())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeAnalyzer;
    use super::*;
    use crate::models::settings::AnalyzerSettings;
    use crate::models::Severity;

    struct Recorder {
        events: Vec<String>,
    }

    impl RunObserver for Recorder {
        fn file_started(&mut self, p: &str) {
            self.events.push(format!("start {}", p));
        }
        fn file_finished(&mut self, r: &FileReport) {
            self.events.push(format!("done {}", r.file));
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/proj").join(n)).collect()
    }

    #[test]
    fn test_mixed_findings_counted_and_fail() {
        let fake = FakeAnalyzer::default().with("a.ps1", Ok(vec![Severity::Warning, Severity::Error]));
        let res = run_analysis(
            &paths(&["a.ps1"]),
            Path::new("/proj"),
            &fake,
            &AnalyzeRequest::default(),
            &mut (),
        );
        assert_eq!(
            res.counts,
            SeverityCounts {
                error: 1,
                warning: 1,
                information: 0
            }
        );
        assert_eq!(res.exit_code, 1);
    }

    #[test]
    fn test_clean_file_leaves_counts_and_exit_untouched() {
        let fake = FakeAnalyzer::default();
        let res = run_analysis(
            &paths(&["a.ps1"]),
            Path::new("/proj"),
            &fake,
            &AnalyzeRequest::default(),
            &mut (),
        );
        assert_eq!(res.counts, SeverityCounts::default());
        assert_eq!(res.exit_code, 0);
        assert!(matches!(res.files[0].outcome, FileOutcome::Clean));
    }

    #[test]
    fn test_information_only_still_fails() {
        let fake = FakeAnalyzer::default().with("a.ps1", Ok(vec![Severity::Information]));
        let res = run_analysis(
            &paths(&["a.ps1", "b.ps1"]),
            Path::new("/proj"),
            &fake,
            &AnalyzeRequest::default(),
            &mut (),
        );
        assert_eq!(res.counts.information, 1);
        assert_eq!(res.exit_code, 1);
    }

    #[test]
    fn test_unknown_severity_fails_without_bucket() {
        let fake = FakeAnalyzer::default().with("a.ps1", Ok(vec![Severity::Other("Hint".into())]));
        let res = run_analysis(
            &paths(&["a.ps1"]),
            Path::new("/proj"),
            &fake,
            &AnalyzeRequest::default(),
            &mut (),
        );
        assert_eq!(res.counts.total(), 0);
        assert_eq!(res.exit_code, 1);
    }

    #[test]
    fn test_engine_error_does_not_stop_loop() {
        let fake = FakeAnalyzer::default()
            .with("one.ps1", Err("unexpected token".into()))
            .with("two.ps1", Ok(vec![]));
        let mut rec = Recorder { events: vec![] };
        let res = run_analysis(
            &paths(&["one.ps1", "two.ps1"]),
            Path::new("/proj"),
            &fake,
            &AnalyzeRequest::default(),
            &mut rec,
        );
        assert_eq!(fake.calls.borrow().len(), 2);
        assert_eq!(res.exit_code, 1);
        assert_eq!(res.engine_errors(), 1);
        assert!(matches!(res.files[1].outcome, FileOutcome::Clean));
        assert_eq!(
            rec.events,
            vec!["start one.ps1", "done one.ps1", "start two.ps1", "done two.ps1"]
        );
    }

    #[test]
    fn test_counts_accumulate_across_files() {
        let fake = FakeAnalyzer::default()
            .with("a.ps1", Ok(vec![Severity::Error, Severity::Error]))
            .with("b.ps1", Ok(vec![Severity::Warning, Severity::Information]));
        let res = run_analysis(
            &paths(&["a.ps1", "sub/b.ps1"]),
            Path::new("/proj"),
            &fake,
            &AnalyzeRequest::default(),
            &mut (),
        );
        assert_eq!(
            res.counts,
            SeverityCounts {
                error: 2,
                warning: 1,
                information: 1
            }
        );
        assert_eq!(res.files[1].file, "sub/b.ps1");
    }

    #[test]
    fn test_request_flags_forwarded() {
        let fake = FakeAnalyzer::default();
        let settings = AnalyzerSettings::default();
        let req = AnalyzeRequest {
            fix: true,
            settings: Some(&settings),
        };
        run_analysis(&paths(&["a.ps1"]), Path::new("/proj"), &fake, &req, &mut ());
        assert_eq!(fake.calls.borrow()[0], (PathBuf::from("/proj/a.ps1"), true, true));
    }

    #[test]
    fn test_no_files_is_success() {
        let res = aggregate(Vec::new());
        assert_eq!(res.exit_code, 0);
        assert_eq!(res.counts, SeverityCounts::default());
    }
}
