//! # sdrift CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sdrift_cli::check::{run_check, CheckArgs};
use sdrift_cli::paths::{run_paths, PathsArgs};
use sdrift_cli::EXIT_OPERATIONAL_ERROR;

/// Schema/surface drift checker.
///
/// Verifies that every field a view or template reads from its data object
/// is declared in the schema that object comes from.
#[derive(Parser, Debug)]
#[command(name = "sdrift", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file (default: nearest sdrift.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check every configured source file against its schema.
    Check(CheckArgs),

    /// Print every valid field path declared by a schema file.
    Paths(PathsArgs),
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

    tracing::debug!("sdrift v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Check(args) => run_check(&args, cli.config.as_deref(), cli.verbose),
        Commands::Paths(args) => run_paths(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_OPERATIONAL_ERROR)
        }
    }
}
