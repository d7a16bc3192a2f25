//! Source aggregation with collision detection
//!
//! An [`Aggregate`] is the desired state of a target directory: the union of
//! several sources whose paths must be disjoint.

use crate::manifest::MANIFEST_FILE;
use crate::source::FileSource;
use crate::{Error, Result};
use clerk_fs::RelativePath;
use std::collections::BTreeMap;

struct Entry {
    source: Box<dyn FileSource>,
    files: Vec<RelativePath>,
}

/// An ordered set of sources with pairwise-disjoint paths.
///
/// Each source is walked once, when it is added. Sources are immutable, so
/// the recorded file list is what later runs reconcile.
#[derive(Default)]
pub struct Aggregate {
    entries: Vec<Entry>,
    claimed: BTreeMap<RelativePath, usize>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source to the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Collision`] if any path in `source` is already
    /// supplied by an earlier source, or [`Error::ReservedPath`] if it
    /// supplies the manifest file itself. On error the aggregate is unchanged.
    pub fn add(&mut self, source: impl FileSource + 'static) -> Result<()> {
        let files = source.files()?;

        for path in &files {
            if path.as_str() == MANIFEST_FILE {
                return Err(Error::ReservedPath {
                    path: path.clone(),
                    source_name: source.name().to_string(),
                });
            }
            if let Some((owner, _)) = self.find(path) {
                return Err(Error::Collision {
                    path: path.clone(),
                    existing: owner.name().to_string(),
                    incoming: source.name().to_string(),
                });
            }
        }

        let index = self.entries.len();
        for path in &files {
            self.claimed.insert(path.clone(), index);
        }
        tracing::debug!(source = source.name(), files = files.len(), "Added source");
        self.entries.push(Entry {
            source: Box::new(source),
            files,
        });
        Ok(())
    }

    /// Find which source supplies `path`.
    ///
    /// Returns the owning source and its position in the aggregate.
    pub fn find(&self, path: &RelativePath) -> Option<(&dyn FileSource, usize)> {
        let index = *self.claimed.get(path)?;
        Some((self.entries[index].source.as_ref(), index))
    }

    /// Iterate sources in the order they were added, with their files.
    pub fn sources(&self) -> impl Iterator<Item = (&dyn FileSource, &[RelativePath])> {
        self.entries
            .iter()
            .map(|entry| (entry.source.as_ref(), entry.files.as_slice()))
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregate")
            .field(
                "sources",
                &self
                    .entries
                    .iter()
                    .map(|e| e.source.name())
                    .collect::<Vec<_>>(),
            )
            .field("files", &self.claimed.len())
            .finish()
    }
}
