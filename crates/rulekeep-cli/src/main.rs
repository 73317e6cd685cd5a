//! # rulekeep CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rulekeep_cli::check::{run_check, CheckArgs};
use rulekeep_cli::manifest::{run_manifest, ManifestArgs};
use rulekeep_cli::toc::{run_toc, TocArgs};

/// rulekeep — ruleset data directory tool
///
/// Loads a ruleset data directory into the validated ruleset model and
/// reports on it.
#[derive(Parser, Debug)]
#[command(name = "rulekeep", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and validate a data directory and print a summary.
    Check(CheckArgs),

    /// Print the table of contents.
    Toc(TocArgs),

    /// Print, write or compare the per-rule property list.
    Manifest(ManifestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("rulekeep CLI starting");

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Toc(args) => run_toc(&args),
        Commands::Manifest(args) => run_manifest(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
