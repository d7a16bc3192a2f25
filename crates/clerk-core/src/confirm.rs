//! Confirmation of destructive actions
//!
//! The reconciler never decides on its own to clobber a file someone else
//! changed. It asks a [`Confirm`] implementation, and every implementation
//! here treats anything short of an explicit "yes" as "no".

use clerk_fs::RelativePath;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// The destructive action awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Replace a drifted file with source content
    Overwrite,
    /// Delete a drifted file no source supplies anymore
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overwrite => f.write_str("overwrite"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// What is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt<'a> {
    pub path: &'a RelativePath,
    pub action: Action,
}

impl<'a> Prompt<'a> {
    pub fn new(path: &'a RelativePath, action: Action) -> Self {
        Self { path, action }
    }

    /// Human-readable question, without the answer hint.
    pub fn message(&self) -> String {
        let verb = match self.action {
            Action::Overwrite => "Overwrite",
            Action::Delete => "Delete",
        };
        format!("File '{}' changed. {}?", self.path, verb)
    }
}

/// A yes/no decision for a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Prompt<'_>) -> bool,
{
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool {
        self(prompt)
    }
}

/// Refuse every destructive action.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deny;

impl Confirm for Deny {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool {
        tracing::debug!(path = %prompt.path, action = %prompt.action, "Denied without asking");
        false
    }
}

/// Approve every destructive action.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accept;

impl Confirm for Accept {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool {
        tracing::debug!(path = %prompt.path, action = %prompt.action, "Approved without asking");
        true
    }
}

/// Ask on a text stream and read a `y/N` answer from a line of input.
///
/// Only an answer starting with `y` or `Y` approves. End of input, read
/// errors and blank lines deny.
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool {
        if write!(self.output, "{} [y/N] ", prompt.message()).is_err() || self.output.flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim_start().chars().next(), Some('y' | 'Y')),
        }
    }
}

/// How drifted files are handled when no operator is asked explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftPolicy {
    /// Ask the operator for every drifted file
    #[default]
    Prompt,
    /// Leave every drifted file alone
    Deny,
    /// Overwrite or delete drifted files without asking
    Accept,
}

impl std::str::FromStr for DriftPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "deny" => Ok(Self::Deny),
            "accept" => Ok(Self::Accept),
            other => Err(format!("unknown drift policy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ask(input: &str) -> (bool, String) {
        let path = RelativePath::new("a/b.txt").unwrap();
        let mut confirm = LineConfirm::new(input.as_bytes(), Vec::new());
        let answer = confirm.confirm(&Prompt::new(&path, Action::Overwrite));
        let (_, output) = confirm.into_inner();
        (answer, String::from_utf8(output).unwrap())
    }

    #[rstest]
    #[case("y\n", true)]
    #[case("Y\n", true)]
    #[case("yes\n", true)]
    #[case("  y\n", true)]
    #[case("n\n", false)]
    #[case("no\n", false)]
    #[case("\n", false)]
    #[case("", false)]
    #[case("maybe\n", false)]
    fn line_confirm_answers(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(ask(input).0, expected);
    }

    #[test]
    fn line_confirm_prints_prompt() {
        let (_, output) = ask("n\n");
        assert_eq!(output, "File 'a/b.txt' changed. Overwrite? [y/N] ");
    }

    #[test]
    fn closures_are_confirmers() {
        let path = RelativePath::new("x").unwrap();
        let mut asked = Vec::new();
        let mut confirm = |prompt: &Prompt<'_>| {
            asked.push((prompt.path.to_string(), prompt.action));
            prompt.action == Action::Delete
        };

        assert!(!confirm.confirm(&Prompt::new(&path, Action::Overwrite)));
        assert!(confirm.confirm(&Prompt::new(&path, Action::Delete)));
        assert_eq!(asked.len(), 2);
    }

    #[test]
    fn fixed_strategies() {
        let path = RelativePath::new("x").unwrap();
        let prompt = Prompt::new(&path, Action::Delete);
        assert!(!Deny.confirm(&prompt));
        assert!(Accept.confirm(&prompt));
    }

    #[test]
    fn drift_policy_parses() {
        assert_eq!("Accept".parse::<DriftPolicy>().unwrap(), DriftPolicy::Accept);
        assert_eq!(DriftPolicy::default(), DriftPolicy::Prompt);
        assert!("sometimes".parse::<DriftPolicy>().is_err());
    }
}
