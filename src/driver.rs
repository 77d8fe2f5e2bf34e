//! Orchestration for the `check` and `files` commands.
//!
//! Only an unresolvable root or scan directory (and an unusable config,
//! handled before this point) aborts a run. Settings and ignore-file
//! problems are reported as notices and the run continues.

use crate::analyzer::{AnalyzeRequest, Analyzer};
use crate::config::Effective;
use crate::error::PathResolutionError;
use crate::ignore::{merge_excludes, read_ignore_file};
use crate::models::settings::AnalyzerSettings;
use crate::models::RunResult;
use crate::output::{print_run, OutputMode};
use crate::runner::{display_path, run_analysis, RunObserver};
use crate::select::{resolve_dir, select_files, FilterCriteria};
use crate::settings::load_settings;
use crate::utils::{info_prefix, note_prefix};
use std::path::PathBuf;
use tracing::{info, warn};

/// Files chosen for a run, plus the root used to display them.
pub struct Selection {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
}

impl Selection {
    pub fn display_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|f| display_path(f, &self.root))
            .collect()
    }
}

/// Settings to hand to the analyzer; any load failure degrades to `None`.
pub fn settings_or_default(eff: &Effective) -> Option<AnalyzerSettings> {
    match load_settings(&eff.settings) {
        Ok(s) => s,
        Err(e) => {
            warn!("ignoring settings: {}", e);
            eprintln!(
                "{} {}; continuing with the analyzer's default settings",
                note_prefix(),
                e
            );
            None
        }
    }
}

/// Explicit excludes followed by the ignore file's patterns.
pub fn effective_criteria(eff: &Effective) -> FilterCriteria {
    let from_file = match read_ignore_file(&eff.ignore_file) {
        Ok(patterns) => patterns,
        Err(e) => {
            warn!("cannot read ignore file {}: {}", eff.ignore_file.display(), e);
            eprintln!(
                "{} cannot read ignore file {}: {}",
                note_prefix(),
                eff.ignore_file.display(),
                e
            );
            None
        }
    };
    FilterCriteria {
        includes: eff.criteria.includes.clone(),
        excludes: merge_excludes(&eff.criteria.excludes, from_file),
    }
}

/// Resolve the root and select files to analyze.
pub fn select(eff: &Effective) -> Result<Selection, PathResolutionError> {
    let root = resolve_dir(&eff.root)?;
    select_under(eff, root)
}

fn select_under(eff: &Effective, root: PathBuf) -> Result<Selection, PathResolutionError> {
    let criteria = effective_criteria(eff);
    let files = select_files(&eff.directory, &criteria, eff.extensions.as_slice())?;
    Ok(Selection { root, files })
}

/// Run `check`: select, analyze, summarize.
///
/// An empty selection skips the analyzer entirely and succeeds.
pub fn run_check(
    eff: &Effective,
    analyzer: &dyn Analyzer,
    observer: &mut dyn RunObserver,
) -> Result<RunResult, PathResolutionError> {
    let root = resolve_dir(&eff.root)?;
    let settings = settings_or_default(eff);
    let selection = select_under(eff, root)?;
    if selection.files.is_empty() {
        info!("no files matched under {}", eff.directory.display());
        if eff.output == OutputMode::Human {
            eprintln!("{} no files found", info_prefix());
        }
        let res = RunResult::empty();
        if eff.output == OutputMode::Json {
            print_run(&res, eff.output, eff.color);
        }
        return Ok(res);
    }

    let request = AnalyzeRequest {
        fix: eff.fix,
        settings: settings.as_ref(),
    };
    let res = run_analysis(&selection.files, &selection.root, analyzer, &request, observer);
    print_run(&res, eff.output, eff.color);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::OutputFormat;
    use crate::models::{Severity, SeverityCounts};
    use crate::runner::testing::FakeAnalyzer;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn eff_for(root: &Path) -> Effective {
        let root = fs::canonicalize(root).unwrap();
        Effective {
            config_file: None,
            directory: root.clone(),
            criteria: FilterCriteria::default(),
            ignore_file: root.join(".scriptlintignore"),
            settings: root.join("ScriptLintSettings.toml"),
            output: OutputMode::Json,
            color: false,
            fix: false,
            extensions: vec!["ps1".into(), "psm1".into(), "psd1".into()],
            analyzer_command: vec![],
            fix_args: vec![],
            settings_arg: "--settings-json".into(),
            format: OutputFormat::Json,
            root,
        }
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.ps1"), "").unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("vendor/v.ps1"), "").unwrap();
        dir
    }

    #[test]
    fn test_empty_selection_never_invokes_analyzer() {
        let dir = tree();
        let mut eff = eff_for(dir.path());
        eff.criteria.includes = Some(vec![]);
        let fake = FakeAnalyzer::default();
        let res = run_check(&eff, &fake, &mut ()).unwrap();
        assert_eq!(res.exit_code, 0);
        assert!(fake.calls.borrow().is_empty());
    }

    #[test]
    fn test_ignore_file_patterns_appended_to_excludes() {
        let dir = tree();
        fs::write(dir.path().join(".scriptlintignore"), "vendor\n").unwrap();
        let mut eff = eff_for(dir.path());
        eff.criteria.excludes = vec!["build".into()];
        let criteria = effective_criteria(&eff);
        assert_eq!(criteria.excludes, vec!["build".to_string(), "vendor".to_string()]);

        let sel = select(&eff).unwrap();
        assert_eq!(sel.display_paths(), vec!["a.ps1"]);
    }

    #[test]
    fn test_bad_settings_fall_back_to_none() {
        let dir = tree();
        fs::write(dir.path().join("ScriptLintSettings.toml"), "severity = [").unwrap();
        let eff = eff_for(dir.path());
        assert!(settings_or_default(&eff).is_none());

        let fake = FakeAnalyzer::default();
        let res = run_check(&eff, &fake, &mut ()).unwrap();
        assert_eq!(res.exit_code, 0);
        assert!(fake.calls.borrow().iter().all(|(_, _, has_settings)| !has_settings));
    }

    #[test]
    fn test_settings_and_fix_passed_to_analyzer() {
        let dir = tree();
        fs::write(
            dir.path().join("ScriptLintSettings.toml"),
            "excludeRules = [\"AvoidAlias\"]\n",
        )
        .unwrap();
        let mut eff = eff_for(dir.path());
        eff.fix = true;
        let fake = FakeAnalyzer::default();
        run_check(&eff, &fake, &mut ()).unwrap();
        let calls = fake.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(_, fix, has_settings)| *fix && *has_settings));
    }

    #[test]
    fn test_engine_error_on_first_file_still_analyzes_second() {
        let dir = tree();
        let eff = eff_for(dir.path());
        let fake = FakeAnalyzer::default().with("a.ps1", Err("unexpected token".into()));
        let res = run_check(&eff, &fake, &mut ()).unwrap();
        assert_eq!(fake.calls.borrow().len(), 2);
        assert_eq!(res.exit_code, 1);
        assert_eq!(res.engine_errors(), 1);
    }

    #[test]
    fn test_findings_drive_exit_code_and_counts() {
        let dir = tree();
        let eff = eff_for(dir.path());
        let fake = FakeAnalyzer::default().with("v.ps1", Ok(vec![Severity::Warning, Severity::Error]));
        let res = run_check(&eff, &fake, &mut ()).unwrap();
        assert_eq!(
            res.counts,
            SeverityCounts {
                error: 1,
                warning: 1,
                information: 0
            }
        );
        assert_eq!(res.exit_code, 1);
        assert_eq!(res.files[1].file, "vendor/v.ps1");
    }

    #[test]
    fn test_unresolvable_directory_is_fatal() {
        let dir = tree();
        let mut eff = eff_for(dir.path());
        eff.directory = dir.path().join("does-not-exist");
        let fake = FakeAnalyzer::default();
        assert!(run_check(&eff, &fake, &mut ()).is_err());
        assert!(fake.calls.borrow().is_empty());
    }
}
