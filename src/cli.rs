//! CLI argument parsing via `clap`.

use crate::config::Overrides;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scriptlint",
    version,
    about = "Run a script analyzer over a filtered file set",
    long_about = "scriptlint selects script files under a directory, runs an external analyzer on each one, and exits non-zero when any file has findings.\n\nConfiguration precedence: CLI > scriptlint.toml > defaults.",
    after_help = "Examples:\n  scriptlint check\n  scriptlint check --include src --exclude generated --fix\n  scriptlint check --analyzer ./tools/analyze --output json\n  scriptlint files --exclude tests",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug, Clone, Default)]
/// Options shared by every command that selects files.
pub struct SelectArgs {
    #[arg(long, help = "Project root (default: nearest ancestor with scriptlint.toml or .git)")]
    pub root: Option<String>,
    #[arg(long, help = "Directory to scan, relative to the root (default: .)")]
    pub directory: Option<String>,
    #[arg(
        long,
        num_args = 0..,
        value_delimiter = ',',
        help = "Only keep paths containing one of these patterns; with no value, keep nothing"
    )]
    pub include: Option<Vec<String>>,
    #[arg(long, num_args = 1.., value_delimiter = ',', help = "Drop paths containing any of these patterns")]
    pub exclude: Option<Vec<String>>,
    #[arg(long, help = "File with extra exclude patterns, one per line (default: .scriptlintignore)")]
    pub ignore_file: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current scriptlint version.")]
    Version,
    /// Analyze selected files
    #[command(
        about = "Run the analyzer",
        long_about = "Analyze every selected file with the configured analyzer. Any finding, including informational ones, makes the run exit with status 1.",
        after_help = "Examples:\n  scriptlint check --settings ScriptLintSettings.toml\n  scriptlint check --fix --include modules"
    )]
    Check {
        #[command(flatten)]
        select: SelectArgs,
        #[arg(long, help = "Analyzer settings file (default: ScriptLintSettings.toml)")]
        settings: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Ask the analyzer to fix findings in place")]
        fix: bool,
        #[arg(long, help = "Analyzer program (replaces [analyzer].command[0])")]
        analyzer: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable coloured output")]
        no_color: bool,
    },
    /// List selected files without analyzing them
    #[command(
        about = "List selected files",
        long_about = "Print the files a check run would analyze, after include, exclude and ignore-file filtering."
    )]
    Files {
        #[command(flatten)]
        select: SelectArgs,
    },
}

impl SelectArgs {
    /// Overrides carrying only the selection options.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            directory: self.directory.clone(),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            ignore_file: self.ignore_file.clone(),
            output: self.output.clone(),
            ..Default::default()
        }
    }
}
