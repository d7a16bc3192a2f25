//! Apply command implementation

use colored::Colorize;

use clerk_core::{ApplyReport, DriftPolicy};

use super::resolve;
use crate::cli::RunArgs;
use crate::error::Result;
use crate::interactive;

/// Run the apply command
///
/// `policy` overrides the configured drift policy when set.
pub fn run_apply(run: &RunArgs, policy: Option<DriftPolicy>) -> Result<()> {
    let resolved = resolve(run)?;
    let mut confirm = interactive::confirmer(policy.unwrap_or(resolved.on_drift));

    println!(
        "{} Applying {} source(s) to {}",
        "=>".blue().bold(),
        resolved.aggregate.len(),
        resolved.target.display().to_string().cyan()
    );

    let report = resolved
        .aggregate
        .apply(&resolved.target, confirm.as_mut())?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ApplyReport) {
    for path in &report.added {
        println!("   {} {}", "+".green(), path);
    }
    for path in &report.updated {
        println!("   {} {}", "~".yellow(), path);
    }
    for path in &report.adopted {
        println!("   {} {} {}", "=".blue(), path, "(adopted)".dimmed());
    }
    for path in &report.removed {
        println!("   {} {}", "-".red(), path);
    }
    for (path, action) in &report.skipped {
        println!(
            "   {} {} {}",
            "!".red(),
            path.to_string().cyan(),
            format!("(changed locally, {} skipped)", action).dimmed()
        );
    }

    if report.is_noop() {
        println!("{} Already up to date.", "OK".green().bold());
    } else {
        println!(
            "{} {} written, {} removed, {} unchanged, {} skipped",
            "OK".green().bold(),
            report.writes(),
            report.removed.len(),
            report.kept.len(),
            report.skipped.len()
        );
    }
}
