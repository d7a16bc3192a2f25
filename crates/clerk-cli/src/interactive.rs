//! Interactive confirmation for drifted files
//!
//! Uses dialoguer on a terminal. Without a terminal, reads `y/N` answers
//! line by line from stdin so answers can be piped in.

use clerk_core::{Accept, Confirm, Deny, DriftPolicy, LineConfirm, Prompt};
use colored::Colorize;
use std::io::IsTerminal;

/// Terminal prompt defaulting to "no".
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool {
        let question = format!("{} {}", "!".yellow().bold(), prompt.message());
        match dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Prompt failed, treating as no: {}", e);
                false
            }
        }
    }
}

/// Pick the confirmation strategy for a run.
pub fn confirmer(policy: DriftPolicy) -> Box<dyn Confirm> {
    match policy {
        DriftPolicy::Accept => Box::new(Accept),
        DriftPolicy::Deny => Box::new(Deny),
        DriftPolicy::Prompt if std::io::stdin().is_terminal() => Box::new(TerminalConfirm),
        DriftPolicy::Prompt => Box::new(LineConfirm::new(
            std::io::stdin().lock(),
            std::io::stderr(),
        )),
    }
}
