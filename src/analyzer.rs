//! External analyzer invocation.
//!
//! The analyzer is a black box behind the `Analyzer` trait. The shipped
//! implementation, `CommandAnalyzer`, runs a configured program once per
//! file and parses the diagnostics it prints:
//! 1. Build argv from the command template, fix args and settings.
//! 2. Run the program synchronously and capture stdout/stderr.
//! 3. Parse stdout as JSON or as `file:line:col: severity: message` lines.

use crate::error::AnalyzerError;
use crate::models::settings::AnalyzerSettings;
use crate::models::{Diagnostic, Severity};
use regex::Regex;
use serde_json::Value as Json;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use tracing::debug;

/// Placeholder replaced by the analyzed file's path in command arguments.
pub const FILE_PLACEHOLDER: &str = "{file}";

#[derive(Debug, Clone, Copy, Default)]
/// How one file should be analyzed.
pub struct AnalyzeRequest<'a> {
    /// Ask the analyzer to rewrite fixable findings in place.
    pub fix: bool,
    /// `None` leaves the analyzer on its own defaults.
    pub settings: Option<&'a AnalyzerSettings>,
}

/// Something that turns a script file into diagnostics.
pub trait Analyzer {
    fn analyze(
        &self,
        path: &Path,
        request: &AnalyzeRequest<'_>,
    ) -> Result<Vec<Diagnostic>, AnalyzerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shape of the analyzer's stdout.
pub enum OutputFormat {
    #[default]
    Json,
    Lines,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<OutputFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "lines" | "line" | "text" => Some(OutputFormat::Lines),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Runs an external program per file.
pub struct CommandAnalyzer {
    /// Program followed by its arguments; `{file}` marks where the path goes.
    pub command: Vec<String>,
    /// Extra arguments passed only in fix mode.
    pub fix_args: Vec<String>,
    /// Flag introducing the settings JSON, passed only when settings exist.
    pub settings_arg: String,
    pub format: OutputFormat,
}

impl CommandAnalyzer {
    pub fn new(command: Vec<String>) -> Self {
        CommandAnalyzer {
            command,
            fix_args: vec!["--fix".to_string()],
            settings_arg: "--settings-json".to_string(),
            format: OutputFormat::Json,
        }
    }

    pub fn with_fix_args(mut self, args: Vec<String>) -> Self {
        self.fix_args = args;
        self
    }

    pub fn with_settings_arg(mut self, arg: impl Into<String>) -> Self {
        self.settings_arg = arg.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Full argv (program first) for analyzing `path`.
    pub fn build_argv(&self, path: &Path, request: &AnalyzeRequest<'_>) -> Vec<String> {
        let file = path.to_string_lossy();
        let mut options: Vec<String> = Vec::new();
        if request.fix {
            options.extend(self.fix_args.iter().cloned());
        }
        if let Some(settings) = request.settings {
            options.push(self.settings_arg.clone());
            options.push(settings.to_json_arg());
        }

        let mut argv: Vec<String> = Vec::with_capacity(self.command.len() + options.len() + 1);
        let mut placed = false;
        for (i, arg) in self.command.iter().enumerate() {
            if i > 0 && arg.contains(FILE_PLACEHOLDER) {
                if !placed {
                    argv.append(&mut options);
                    placed = true;
                }
                argv.push(arg.replace(FILE_PLACEHOLDER, &file));
            } else {
                argv.push(arg.clone());
            }
        }
        if !placed {
            argv.append(&mut options);
            argv.push(file.into_owned());
        }
        argv
    }
}

impl Analyzer for CommandAnalyzer {
    fn analyze(
        &self,
        path: &Path,
        request: &AnalyzeRequest<'_>,
    ) -> Result<Vec<Diagnostic>, AnalyzerError> {
        let argv = self.build_argv(path, request);
        let Some((program, args)) = argv.split_first() else {
            return Err(AnalyzerError::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            });
        };
        debug!("running analyzer: {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| AnalyzerError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stdout.trim().is_empty() {
            if output.status.success() {
                return Ok(Vec::new());
            }
            return Err(AnalyzerError::Failed {
                code: output.status.code(),
                stderr: stderr.into_owned(),
            });
        }
        // Analyzers commonly exit non-zero when they report findings.
        match self.format {
            OutputFormat::Json => parse_json_output(&stdout),
            OutputFormat::Lines => parse_line_output(&stdout),
        }
    }
}

/// Parse a JSON array of diagnostics, a single diagnostic object, or `null`.
pub fn parse_json_output(stdout: &str) -> Result<Vec<Diagnostic>, AnalyzerError> {
    let value: Json =
        serde_json::from_str(stdout.trim()).map_err(|e| AnalyzerError::Parse(e.to_string()))?;
    let items = match value {
        Json::Null => return Ok(Vec::new()),
        Json::Array(items) => items,
        obj @ Json::Object(_) => vec![obj],
        other => {
            return Err(AnalyzerError::Parse(format!(
                "expected an array of diagnostics, got {}",
                other
            )))
        }
    };
    items
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(|e| AnalyzerError::Parse(e.to_string())))
        .collect()
}

fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<file>.+?):(?P<line>\d+):(?P<col>\d+):\s*(?P<sev>[A-Za-z]+)(?:\s*\[(?P<rule>[^\]]+)\])?:\s*(?P<msg>.*)$",
        )
        .expect("diagnostic line regex is valid")
    })
}

/// Parse `file:line:col: severity[ [rule]]: message` lines.
pub fn parse_line_output(stdout: &str) -> Result<Vec<Diagnostic>, AnalyzerError> {
    let re = line_regex();
    let mut out = Vec::new();
    for (n, raw) in stdout.lines().enumerate() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        let caps = re.captures(line).ok_or_else(|| {
            AnalyzerError::Parse(format!("unrecognized output on line {}: {}", n + 1, line))
        })?;
        out.push(Diagnostic {
            rule: caps.name("rule").map(|m| m.as_str().to_string()),
            severity: Severity::from_name(&caps["sev"]),
            message: caps["msg"].to_string(),
            line: caps["line"].parse().ok(),
            column: caps["col"].parse().ok(),
        });
    }
    Ok(out)
}
