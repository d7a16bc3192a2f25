//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// clerk - keep generated files in a directory without disturbing the rest
#[derive(Parser, Debug)]
#[command(name = "clerk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write source files into the target directory and remove stale ones
    ///
    /// Files changed since clerk last wrote them are only overwritten or
    /// deleted after confirmation.
    ///
    /// Examples:
    ///   clerk apply templates/ --into out/
    ///   clerk apply --config clerk.toml --yes
    Apply {
        #[command(flatten)]
        run: RunArgs,

        /// Overwrite and delete changed files without asking
        #[arg(short, long, conflicts_with = "no")]
        yes: bool,

        /// Never overwrite or delete changed files
        #[arg(short, long)]
        no: bool,
    },

    /// Show what apply would do, without changing anything
    Plan {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Report managed files changed since they were last written
    Verify {
        /// Target directory holding clerk.sum
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

/// Where files come from and where they go
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Source directories, in order
    pub sources: Vec<PathBuf>,

    /// Target directory (defaults to the config's target, then ".")
    #[arg(short = 'o', long = "into")]
    pub into: Option<PathBuf>,

    /// Config file (.toml or .json)
    #[arg(short, long, env = "CLERK_CONFIG")]
    pub config: Option<PathBuf>,
}
