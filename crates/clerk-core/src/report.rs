//! Plan and report types for reconciliation runs

use crate::confirm::Action;
use clerk_fs::RelativePath;
use std::path::PathBuf;

/// What a run does, or would do, to one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// New file, not on disk and not owned yet
    Add,
    /// Owned file, unchanged on disk, with new source content
    Update,
    /// Owned file already matching its source
    Keep,
    /// Owned file edited on disk to equal the source; only the manifest changes
    Adopt,
    /// Owned file no source supplies anymore
    Delete,
    /// Drifted file; needs confirmation before the action happens
    Conflict(Action),
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Update => f.write_str("update"),
            Self::Keep => f.write_str("keep"),
            Self::Adopt => f.write_str("adopt"),
            Self::Delete => f.write_str("delete"),
            Self::Conflict(action) => write!(f, "conflict ({})", action),
        }
    }
}

/// A classified path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub path: RelativePath,
    pub change: Change,
}

/// Read-only preview of a run, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub changes: Vec<PlannedChange>,
}

impl Plan {
    /// True when applying would touch nothing.
    pub fn is_clean(&self) -> bool {
        self.changes.iter().all(|c| c.change == Change::Keep)
    }

    /// Number of paths classified as `change`.
    pub fn count(&self, change: Change) -> usize {
        self.changes.iter().filter(|c| c.change == change).count()
    }

    /// Paths that would prompt for confirmation.
    pub fn conflicts(&self) -> impl Iterator<Item = &PlannedChange> {
        self.changes
            .iter()
            .filter(|c| matches!(c.change, Change::Conflict(_)))
    }

    pub fn get(&self, path: &RelativePath) -> Option<Change> {
        self.changes
            .iter()
            .find(|c| &c.path == path)
            .map(|c| c.change)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Where the manifest was saved
    pub manifest_path: PathBuf,
    pub added: Vec<RelativePath>,
    pub updated: Vec<RelativePath>,
    pub adopted: Vec<RelativePath>,
    pub kept: Vec<RelativePath>,
    pub removed: Vec<RelativePath>,
    /// Declined confirmations
    pub skipped: Vec<(RelativePath, Action)>,
}

impl ApplyReport {
    pub fn new(manifest_path: PathBuf) -> Self {
        Self {
            manifest_path,
            ..Default::default()
        }
    }

    /// Number of files written to disk.
    pub fn writes(&self) -> usize {
        self.added.len() + self.updated.len()
    }

    /// True when the run wrote, removed and skipped nothing.
    pub fn is_noop(&self) -> bool {
        self.writes() == 0 && self.adopted.is_empty() && self.removed.is_empty() && self.skipped.is_empty()
    }
}

/// How a managed file differs from its manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    /// Content changed outside the tool
    Modified,
    /// File is gone or unreadable
    Missing,
}

/// A managed file whose disk state no longer matches the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftItem {
    pub path: RelativePath,
    pub kind: DriftKind,
}
