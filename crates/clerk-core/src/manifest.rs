//! The `clerk.sum` manifest
//!
//! The manifest records, for every file the tool owns in a target
//! directory, the digest of what the tool last wrote there. It is plain text,
//! one `<path> <hex-digest>` record per line, sorted by path.

use crate::{Error, Result};
use clerk_fs::{Digest, RelativePath, io};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the manifest file at the root of a target directory.
pub const MANIFEST_FILE: &str = "clerk.sum";

/// Mapping from owned path to last-written digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<RelativePath, Digest>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest from disk.
    ///
    /// A missing file is an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestFormat`] for the first malformed line, or an
    /// I/O error if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(?path, "No manifest found, starting empty");
                return Ok(Self::new());
            }
            Err(e) => return Err(clerk_fs::Error::io(path, e).into()),
        };
        Self::parse(path, &content)
    }

    /// Parse manifest text. `origin` is only used in error messages.
    pub fn parse(origin: &Path, content: &[u8]) -> Result<Self> {
        let mut entries = BTreeMap::new();
        if content.is_empty() {
            return Ok(Self { entries });
        }
        let body = content.strip_suffix(b"\n").unwrap_or(content);

        for (idx, raw) in body.split(|b| *b == b'\n').enumerate() {
            let line = idx + 1;
            let bad = |reason: String| Error::ManifestFormat {
                path: origin.to_path_buf(),
                line,
                reason,
            };

            let text = std::str::from_utf8(raw).map_err(|_| bad("not valid UTF-8".into()))?;
            if text.is_empty() {
                return Err(bad("blank line".into()));
            }
            if text.contains('\r') {
                return Err(bad("carriage return in record".into()));
            }
            let (path, hex) = text
                .rsplit_once(' ')
                .ok_or_else(|| bad("missing separator".into()))?;

            if hex.is_empty() {
                return Err(bad("empty digest".into()));
            }
            let digest = Digest::from_hex(hex).map_err(|e| bad(format!("bad hash: {}", e)))?;
            let path = RelativePath::new(path).map_err(|e| bad(e.to_string()))?;

            if entries.insert(path.clone(), digest).is_some() {
                return Err(bad(format!("duplicate entry for '{}'", path)));
            }
        }

        Ok(Self { entries })
    }

    /// Check that every entry can be persisted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestIntegrity`] naming the first entry with an
    /// empty digest.
    pub fn validate(&self) -> Result<()> {
        match self.entries.iter().find(|(_, digest)| digest.is_empty()) {
            Some((path, _)) => Err(Error::ManifestIntegrity {
                entry: path.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Render the manifest file content.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (path, digest) in &self.entries {
            out.push_str(path.as_str());
            out.push(' ');
            out.push_str(&digest.to_hex());
            out.push('\n');
        }
        out
    }

    /// Save the manifest atomically.
    ///
    /// Nothing is written if any entry fails validation.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        io::write_atomic(path, self.render().as_bytes())?;
        tracing::debug!(?path, entries = self.entries.len(), "Saved manifest");
        Ok(())
    }

    pub fn get(&self, path: &RelativePath) -> Option<&Digest> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &RelativePath) -> bool {
        self.entries.contains_key(path)
    }

    /// Record a digest, returning the previous one.
    pub fn insert(&mut self, path: RelativePath, digest: Digest) -> Option<Digest> {
        self.entries.insert(path, digest)
    }

    pub fn remove(&mut self, path: &RelativePath) -> Option<Digest> {
        self.entries.remove(path)
    }

    /// Owned paths in manifest order.
    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &Digest)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
