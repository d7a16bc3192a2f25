//! clerk CLI
//!
//! Keeps a directory's generated files in line with their sources while
//! leaving everything else in the directory alone.

mod cli;
mod commands;
mod error;
mod interactive;

use clap::Parser;
use clerk_core::DriftPolicy;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Ignore the error: a subscriber may already be installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Apply { run, yes, no } => {
            let policy = match (yes, no) {
                (true, _) => Some(DriftPolicy::Accept),
                (_, true) => Some(DriftPolicy::Deny),
                _ => None,
            };
            commands::run_apply(&run, policy)
        }
        Commands::Plan { run } => commands::run_plan(&run),
        Commands::Verify { dir } => commands::run_verify(&dir),
    }
}
