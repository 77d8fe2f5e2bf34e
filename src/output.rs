//! Output rendering for `check` and `files`.
//!
//! Supports `human` (default) and `json` outputs. Human output streams a
//! header per file, a findings table and a per-file summary while the run
//! progresses; JSON output prints one document at the end with per-file
//! entries and a top-level summary.

use crate::models::{Diagnostic, FileOutcome, FileReport, RunResult, Severity, SeverityCounts};
use crate::runner::RunObserver;
use crate::utils::plural;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn parse(s: &str) -> Option<OutputMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Some(OutputMode::Human),
            "json" => Some(OutputMode::Json),
            _ => None,
        }
    }
}

/// Streams human-readable progress to stdout.
pub struct HumanObserver {
    pub color: bool,
}

impl RunObserver for HumanObserver {
    fn file_started(&mut self, display_path: &str) {
        let header = format!("==> {}", display_path);
        if self.color {
            println!("{}", header.bold());
        } else {
            println!("{}", header);
        }
    }

    fn file_finished(&mut self, report: &FileReport) {
        for line in render_file_report(report, self.color) {
            println!("{}", line);
        }
    }
}

/// Lines printed after a file has been analyzed.
pub fn render_file_report(report: &FileReport, color: bool) -> Vec<String> {
    match &report.outcome {
        FileOutcome::Clean => {
            let msg = "    no errors";
            vec![if color { msg.green().to_string() } else { msg.to_string() }]
        }
        FileOutcome::EngineError { message } => {
            let msg = format!("    analyzer error: {}", message);
            vec![if color { msg.red().to_string() } else { msg }]
        }
        FileOutcome::Findings { diagnostics, counts } => {
            let mut lines = render_table(diagnostics, color);
            let summary = format!("    {}", count_line(counts));
            lines.push(if color { summary.bold().to_string() } else { summary });
            lines
        }
    }
}

/// Tabular listing of one file's diagnostics: location, severity, rule, message.
pub fn render_table(diagnostics: &[Diagnostic], color: bool) -> Vec<String> {
    let loc_w = diagnostics
        .iter()
        .map(|d| d.location().len())
        .max()
        .unwrap_or(0)
        .max("Line".len());
    let rule_w = diagnostics
        .iter()
        .map(|d| d.rule.as_deref().unwrap_or("-").len())
        .max()
        .unwrap_or(0)
        .max("Rule".len());
    let sev_w = "Information".len();

    let mut lines = Vec::with_capacity(diagnostics.len() + 1);
    let head = format!(
        "    {:<loc_w$}  {:<sev_w$}  {:<rule_w$}  Message",
        "Line", "Severity", "Rule"
    );
    lines.push(if color { head.dimmed().to_string() } else { head });
    for d in diagnostics {
        // Pad before colouring so escape codes do not skew the columns.
        let sev = format!("{:<sev_w$}", d.severity.as_str());
        let sev = if color {
            match d.severity {
                Severity::Error => sev.red().bold().to_string(),
                Severity::Warning => sev.yellow().bold().to_string(),
                Severity::Information => sev.blue().to_string(),
                Severity::Other(_) => sev.magenta().to_string(),
            }
        } else {
            sev
        };
        lines.push(format!(
            "    {:<loc_w$}  {}  {:<rule_w$}  {}",
            d.location(),
            sev,
            d.rule.as_deref().unwrap_or("-"),
            d.message
        ));
    }
    lines
}

fn count_line(c: &SeverityCounts) -> String {
    format!(
        "{}, {}, {}",
        plural(c.error, "error"),
        plural(c.warning, "warning"),
        plural(c.information, "information finding")
    )
}

/// Final aggregate summary line for a run.
pub fn summary_line(res: &RunResult) -> String {
    let mut s = format!(
        "— Summary — files={} errors={} warnings={} infos={}",
        res.files.len(),
        res.counts.error,
        res.counts.warning,
        res.counts.information
    );
    let engine = res.engine_errors();
    if engine > 0 {
        s.push_str(&format!(" analyzer_failures={}", engine));
    }
    s
}

/// Print the end-of-run output in the requested mode.
pub fn print_run(res: &RunResult, mode: OutputMode, color: bool) {
    match mode {
        OutputMode::Json => match serde_json::to_string_pretty(&compose_run_json(res)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
        },
        OutputMode::Human => {
            let summary = summary_line(res);
            if color {
                let styled = if res.exit_code == 0 {
                    summary.green().bold().to_string()
                } else {
                    summary.red().bold().to_string()
                };
                println!("{}", styled);
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print the selected file list for `files`.
pub fn print_files(files: &[String], mode: OutputMode) {
    match mode {
        OutputMode::Json => {
            println!("{}", json!({ "files": files, "total": files.len() }));
        }
        OutputMode::Human => {
            for f in files {
                println!("{}", f);
            }
        }
    }
}

/// Compose run JSON object (pure) for testing/snapshot purposes.
pub fn compose_run_json(res: &RunResult) -> JsonVal {
    json!({
        "results": res.files,
        "summary": {
            "files": res.files.len(),
            "errors": res.counts.error,
            "warnings": res.counts.warning,
            "information": res.counts.information,
            "analyzerFailures": res.engine_errors(),
            "exitCode": res.exit_code,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::aggregate;
    use std::path::PathBuf;

    fn findings_report() -> FileReport {
        let mut d = Diagnostic::new(Severity::Warning, "'gci' is an alias");
        d.rule = Some("AvoidAlias".into());
        d.line = Some(12);
        d.column = Some(4);
        let diagnostics = vec![d, Diagnostic::new(Severity::Error, "missing brace")];
        let counts = SeverityCounts::from_diagnostics(&diagnostics);
        FileReport {
            path: PathBuf::from("/r/a.ps1"),
            file: "a.ps1".into(),
            outcome: FileOutcome::Findings { diagnostics, counts },
        }
    }

    #[test]
    fn test_render_findings_table_plain() {
        let lines = render_file_report(&findings_report(), false);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Severity"));
        assert!(lines[1].contains("12:4"));
        assert!(lines[1].contains("AvoidAlias"));
        assert!(lines[2].contains("Error"));
        assert_eq!(lines[3], "    1 error, 1 warning, 0 information findings");
    }

    #[test]
    fn test_render_clean_and_engine_error() {
        let clean = FileReport {
            path: PathBuf::from("/r/b.ps1"),
            file: "b.ps1".into(),
            outcome: FileOutcome::Clean,
        };
        assert_eq!(render_file_report(&clean, false), vec!["    no errors"]);
        let broken = FileReport {
            path: PathBuf::from("/r/c.ps1"),
            file: "c.ps1".into(),
            outcome: FileOutcome::EngineError {
                message: "parse failure".into(),
            },
        };
        assert_eq!(
            render_file_report(&broken, false),
            vec!["    analyzer error: parse failure"]
        );
    }

    #[test]
    fn test_compose_run_json_shape() {
        let res = aggregate(vec![findings_report()]);
        let out = compose_run_json(&res);
        assert_eq!(out["summary"]["errors"], 1);
        assert_eq!(out["summary"]["warnings"], 1);
        assert_eq!(out["summary"]["exitCode"], 1);
        assert_eq!(out["results"][0]["file"], "a.ps1");
        assert_eq!(out["results"][0]["status"], "findings");
        assert_eq!(out["results"][0]["diagnostics"][0]["rule"], "AvoidAlias");
        assert!(summary_line(&res).contains("errors=1"));
    }

    #[test]
    fn test_output_mode_parse() {
        assert_eq!(OutputMode::parse("JSON"), Some(OutputMode::Json));
        assert_eq!(OutputMode::parse("human"), Some(OutputMode::Human));
        assert_eq!(OutputMode::parse("xml"), None);
    }
}
