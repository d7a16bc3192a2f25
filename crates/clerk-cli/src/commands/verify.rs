//! Verify command implementation

use std::path::Path;

use colored::Colorize;

use clerk_core::DriftKind;

use crate::error::{CliError, Result};

/// Run the verify command
///
/// Fails if any managed file differs from what clerk last wrote.
pub fn run_verify(dir: &Path) -> Result<()> {
    let drift = clerk_core::verify(dir)?;

    if drift.is_empty() {
        println!("{} No drift detected.", "OK".green().bold());
        return Ok(());
    }

    println!("{} Managed files have changed:", "DRIFTED".red().bold());
    for item in &drift {
        let description = match item.kind {
            DriftKind::Modified => "modified",
            DriftKind::Missing => "missing",
        };
        println!("   {} {} ({})", "!".red(), item.path.to_string().cyan(), description);
    }

    Err(CliError::user(format!(
        "{} managed file(s) drifted",
        drift.len()
    )))
}
