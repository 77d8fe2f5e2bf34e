//! scriptlint core library.
//!
//! This crate exposes programmatic APIs for selecting script files and
//! driving an external analyzer over them.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `select`: Recursive discovery with include/exclude filtering.
//! - `pattern`: Substring-wildcard path patterns.
//! - `ignore`: Ignore-file reading.
//! - `settings`: Analyzer settings loading.
//! - `analyzer`: The `Analyzer` seam and the external-command analyzer.
//! - `runner`: Per-file analysis folded into a run result.
//! - `driver`: Orchestration for the `check` and `files` commands.
//! - `models`: Diagnostics, settings schema and run reports.
//! - `output`: Human/JSON printers.
//! - `error`: Error types.
//! - `utils`: Supporting helpers.
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod ignore;
pub mod models;
pub mod output;
pub mod pattern;
pub mod runner;
pub mod select;
pub mod settings;
pub mod utils;
