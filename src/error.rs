//! Error taxonomy for selection, settings, analyzer invocation and config.
//!
//! Only `PathResolutionError` and `ConfigError` abort a run. Settings and
//! analyzer errors are caught at the narrowest scope and turned into notices.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The analysis root or scan directory could not be resolved.
#[derive(Error, Debug)]
#[error("cannot resolve path '{}': {source}", path.display())]
pub struct PathResolutionError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Loading the analyzer settings document failed.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings file '{}' is not valid {format}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("unsupported settings file extension: '{}' (expected .toml, .yaml, .yml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// The external analyzer failed to analyze one file.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("failed to start analyzer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("analyzer exited with {} and produced no output{}", exit_label(*code), stderr_suffix(stderr))]
    Failed { code: Option<i32>, stderr: String },

    #[error("could not parse analyzer output: {0}")]
    Parse(String),
}

/// The driver configuration cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config file '{}': {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("analyzer is not configured. Pass --analyzer or set [analyzer].command in scriptlint.toml")]
    MissingAnalyzer,

    #[error("unknown output mode '{0}' (expected human or json)")]
    UnknownOutput(String),

    #[error("unknown analyzer output format '{0}' (expected json or lines)")]
    UnknownFormat(String),
}

/// Failures that end a `check` or `files` run before any file is analyzed.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Path(#[from] PathResolutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DriverError {
    /// Process exit status for a failed run.
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Path(_) => 1,
            DriverError::Config(_) => 2,
        }
    }
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}
