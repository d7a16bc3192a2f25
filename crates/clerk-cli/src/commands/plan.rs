//! Plan command implementation

use colored::Colorize;

use clerk_core::Change;

use super::resolve;
use crate::cli::RunArgs;
use crate::error::Result;

/// Run the plan command
///
/// Prints what apply would do. Nothing on disk changes.
pub fn run_plan(run: &RunArgs) -> Result<()> {
    let resolved = resolve(run)?;
    let plan = resolved.aggregate.plan(&resolved.target)?;

    if plan.is_clean() {
        println!("{} Nothing to do.", "OK".green().bold());
        return Ok(());
    }

    for item in &plan.changes {
        let marker = match item.change {
            Change::Keep => continue,
            Change::Add => "+".green(),
            Change::Update => "~".yellow(),
            Change::Adopt => "=".blue(),
            Change::Delete => "-".red(),
            Change::Conflict(_) => "!".red().bold(),
        };
        println!("   {} {} {}", marker, item.path, format!("({})", item.change).dimmed());
    }

    let conflicts = plan.conflicts().count();
    if conflicts > 0 {
        println!();
        println!(
            "{} {} file(s) changed locally and will need confirmation.",
            "DRIFTED".red().bold(),
            conflicts
        );
    }
    Ok(())
}
