//! scriptlint CLI binary entry point.
//! Delegates to the library for selection and analysis and sets the exit code.

use clap::Parser;
use scriptlint::cli::{Cli, Commands};
use scriptlint::config::{self, Effective, Overrides};
use scriptlint::driver;
use scriptlint::error::DriverError;
use scriptlint::output::{self, HumanObserver, OutputMode};
use scriptlint::runner::RunObserver;
use scriptlint::utils::{error_prefix, note_prefix};
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCRIPTLINT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn effective(ov: &Overrides) -> Result<Effective, DriverError> {
    let eff = config::resolve_effective(ov)?;
    if eff.config_file.is_none() && eff.output == OutputMode::Human {
        eprintln!("{} No scriptlint.toml found; using defaults.", note_prefix());
    }
    Ok(eff)
}

/// `scriptlint check`; returns the process exit code of the run.
fn check(ov: &Overrides) -> Result<i32, DriverError> {
    let eff = effective(ov)?;
    let analyzer = eff.command_analyzer()?;
    let mut human = HumanObserver { color: eff.color };
    let mut quiet = ();
    let observer: &mut dyn RunObserver = match eff.output {
        OutputMode::Human => &mut human,
        OutputMode::Json => &mut quiet,
    };
    let res = driver::run_check(&eff, &analyzer, observer)?;
    Ok(res.exit_code)
}

/// `scriptlint files`.
fn files(ov: &Overrides) -> Result<i32, DriverError> {
    let eff = effective(ov)?;
    let sel = driver::select(&eff)?;
    output::print_files(&sel.display_paths(), eff.output);
    Ok(0)
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Commands::Check {
            select,
            settings,
            fix,
            analyzer,
            no_color,
        } => check(&Overrides {
            settings,
            fix,
            analyzer,
            no_color,
            ..select.overrides()
        }),
        Commands::Files { select } => files(&select.overrides()),
    };
    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            process::exit(e.exit_code());
        }
    }
}
