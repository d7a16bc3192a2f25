//! Command implementations

pub mod apply;
pub mod plan;
pub mod verify;

pub use apply::run_apply;
pub use plan::run_plan;
pub use verify::run_verify;

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use clerk_core::{Aggregate, ClerkConfig, DriftPolicy};
use std::path::PathBuf;

/// A run with everything resolved from flags and config.
pub struct Resolved {
    pub target: PathBuf,
    pub aggregate: Aggregate,
    pub on_drift: DriftPolicy,
}

/// Merge command-line arguments over the optional config file.
///
/// Sources and target given on the command line replace the configured
/// ones entirely.
pub fn resolve(run: &RunArgs) -> Result<Resolved> {
    let mut config = match &run.config {
        Some(path) => ClerkConfig::load(path)?,
        None => ClerkConfig {
            target: PathBuf::from("."),
            ..Default::default()
        },
    };

    if let Some(into) = &run.into {
        config.target = into.clone();
    }
    if !run.sources.is_empty() {
        config.sources = run.sources.clone();
    } else if run.config.is_none() {
        return Err(CliError::user(
            "No sources given. Pass source directories or --config.",
        ));
    }

    let aggregate = config.aggregate()?;
    Ok(Resolved {
        target: config.target,
        aggregate,
        on_drift: config.on_drift,
    })
}
