//! Configuration discovery and effective settings resolution.
//!
//! scriptlint reads `scriptlint.toml|yaml|yml` from the project root (or the
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `directory`: `.`
//! - `include`: unset (include everything)
//! - `exclude`: empty
//! - `ignore_file`: `.scriptlintignore`
//! - `settings`: `ScriptLintSettings.toml`
//! - `output`: `human`
//! - `extensions`: `ps1`, `psm1`, `psd1`
//! - `analyzer.fix_args`: `["--fix"]`, `analyzer.settings_arg`: `--settings-json`,
//!   `analyzer.format`: `json`
//!
//! Overrides precedence: CLI > config file > defaults. Relative paths are
//! resolved against the project root.

use crate::analyzer::{CommandAnalyzer, OutputFormat};
use crate::error::ConfigError;
use crate::output::OutputMode;
use crate::select::{FilterCriteria, DEFAULT_EXTENSIONS};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILES: [&str; 3] = ["scriptlint.toml", "scriptlint.yaml", "scriptlint.yml"];
pub const DEFAULT_IGNORE_FILE: &str = ".scriptlintignore";
pub const DEFAULT_SETTINGS_FILE: &str = "ScriptLintSettings.toml";

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
/// Analyzer command section under `[analyzer]`.
pub struct AnalyzerCfg {
    pub command: Option<Vec<String>>,
    pub fix_args: Option<Vec<String>>,
    pub settings_arg: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
/// Root configuration loaded from `scriptlint.toml|yaml`.
pub struct ScriptLintConfig {
    pub directory: Option<String>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub ignore_file: Option<String>,
    pub settings: Option<String>,
    pub output: Option<String>,
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub analyzer: Option<AnalyzerCfg>,
}

#[derive(Debug, Default, Clone)]
/// Values supplied on the command line; `None` defers to config/defaults.
pub struct Overrides {
    pub root: Option<String>,
    pub directory: Option<String>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub ignore_file: Option<String>,
    pub settings: Option<String>,
    pub output: Option<String>,
    pub analyzer: Option<String>,
    pub fix: bool,
    pub no_color: bool,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub config_file: Option<PathBuf>,
    pub directory: PathBuf,
    pub criteria: FilterCriteria,
    pub ignore_file: PathBuf,
    pub settings: PathBuf,
    pub output: OutputMode,
    pub color: bool,
    pub fix: bool,
    pub extensions: Vec<String>,
    /// Empty when no analyzer is configured.
    pub analyzer_command: Vec<String>,
    pub fix_args: Vec<String>,
    pub settings_arg: String,
    pub format: OutputFormat,
}

impl Effective {
    /// Build the external-command analyzer, failing when none is configured.
    pub fn command_analyzer(&self) -> Result<CommandAnalyzer, ConfigError> {
        if self.analyzer_command.is_empty() {
            return Err(ConfigError::MissingAnalyzer);
        }
        Ok(CommandAnalyzer::new(self.analyzer_command.clone())
            .with_fix_args(self.fix_args.clone())
            .with_settings_arg(self.settings_arg.clone())
            .with_format(self.format))
    }
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a `scriptlint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_project_root(start: &Path) -> PathBuf {
    let Ok(abs) = fs::canonicalize(start) else {
        return start.to_path_buf();
    };
    let mut cur = abs.as_path();
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).is_file()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return abs,
        }
    }
}

/// Locate the config file in `root`, if any.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.is_file())
}

/// Load `ScriptLintConfig` from `scriptlint.toml` or `scriptlint.yaml|yml` if present.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, ScriptLintConfig)>, ConfigError> {
    let Some(path) = find_config(root) else {
        return Ok(None);
    };
    let invalid = |message: String| ConfigError::Invalid {
        path: path.clone(),
        message,
    };
    let s = fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
    let cfg: ScriptLintConfig = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str(&s).map_err(|e| invalid(e.to_string()))?
    } else if s.trim().is_empty() {
        ScriptLintConfig::default()
    } else {
        serde_yaml::from_str(&s).map_err(|e| invalid(e.to_string()))?
    };
    debug!("loaded config from {}", path.display());
    Ok(Some((path, cfg)))
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli.root.as_deref().unwrap_or("."));
    let root = detect_project_root(&start);
    let (config_file, cfg) = match load_config(&root)? {
        Some((path, cfg)) => (Some(path), cfg),
        None => (None, ScriptLintConfig::default()),
    };

    let directory = cli
        .directory
        .clone()
        .or(cfg.directory)
        .unwrap_or_else(|| ".".to_string());
    let includes = cli.include.clone().or(cfg.include);
    let excludes = cli.exclude.clone().or(cfg.exclude).unwrap_or_default();
    let ignore_file = cli
        .ignore_file
        .clone()
        .or(cfg.ignore_file)
        .unwrap_or_else(|| DEFAULT_IGNORE_FILE.to_string());
    let settings = cli
        .settings
        .clone()
        .or(cfg.settings)
        .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string());

    let output_str = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let output = OutputMode::parse(&output_str).ok_or(ConfigError::UnknownOutput(output_str))?;
    let color = output == OutputMode::Human
        && !cli.no_color
        && std::env::var_os("NO_COLOR").is_none();

    let extensions = cfg
        .extensions
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect());

    let acfg = cfg.analyzer.unwrap_or_default();
    let mut analyzer_command = acfg.command.unwrap_or_default();
    if let Some(program) = cli.analyzer.clone() {
        if analyzer_command.is_empty() {
            analyzer_command.push(program);
        } else {
            analyzer_command[0] = program;
        }
    }
    let format_str = acfg.format.unwrap_or_else(|| "json".to_string());
    let format =
        OutputFormat::parse(&format_str).ok_or(ConfigError::UnknownFormat(format_str))?;

    Ok(Effective {
        directory: root.join(directory),
        criteria: FilterCriteria { includes, excludes },
        ignore_file: root.join(ignore_file),
        settings: root.join(settings),
        output,
        color,
        fix: cli.fix,
        extensions,
        analyzer_command,
        fix_args: acfg
            .fix_args
            .unwrap_or_else(|| vec!["--fix".to_string()]),
        settings_arg: acfg
            .settings_arg
            .unwrap_or_else(|| "--settings-json".to_string()),
        format,
        config_file,
        root,
    })
}
