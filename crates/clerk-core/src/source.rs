//! Virtual, read-only file sources
//!
//! A source is a walkable namespace of relative paths to byte content.
//! Directories are structural only: [`FileSource::files`] lists file leaves.

use crate::{Error, Result};
use clerk_fs::RelativePath;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A read-only hierarchy of files.
pub trait FileSource {
    /// Label used in diagnostics and collision errors.
    fn name(&self) -> &str;

    /// Every file path in the source, sorted and free of duplicates.
    fn files(&self) -> Result<Vec<RelativePath>>;

    /// Open a file for reading.
    fn open(&self, path: &RelativePath) -> Result<Box<dyn Read + '_>>;
}

/// An in-memory source, mostly for tests and generated content.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    files: BTreeMap<RelativePath, Vec<u8>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeMap::new(),
        }
    }

    /// Add or replace a file.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid relative path.
    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) -> Result<()> {
        let path = RelativePath::new(path)?;
        self.files.insert(path, content.into());
        Ok(())
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Result<Self> {
        self.insert(path, content)?;
        Ok(self)
    }
}

impl FileSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn files(&self) -> Result<Vec<RelativePath>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn open(&self, path: &RelativePath) -> Result<Box<dyn Read + '_>> {
        match self.files.get(path) {
            Some(content) => Ok(Box::new(content.as_slice())),
            None => Err(Error::Source {
                source_name: self.name.clone(),
                path: path.to_string(),
                source: std::io::ErrorKind::NotFound.into(),
            }),
        }
    }
}

/// A physical directory exposed as a source.
///
/// Symlinks are not followed; only regular files are listed.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    name: String,
}

impl DirSource {
    /// Open a directory as a source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] if `root` does not exist or is not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let given = root.as_ref();
        let name = given.display().to_string();
        let root = dunce::canonicalize(given).map_err(|source| Error::Source {
            source_name: name.clone(),
            path: ".".to_string(),
            source,
        })?;

        if !root.is_dir() {
            return Err(Error::Source {
                source_name: name,
                path: ".".to_string(),
                source: std::io::Error::other("not a directory"),
            });
        }

        Ok(Self { root, name })
    }
}

impl FileSource for DirSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn files(&self) -> Result<Vec<RelativePath>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Source {
                source_name: self.name.clone(),
                path: e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|_| Error::Source {
                    source_name: self.name.clone(),
                    path: entry.path().display().to_string(),
                    source: std::io::Error::other("entry outside source root"),
                })?;
            files.push(RelativePath::new(relative)?);
        }

        // Walk order groups by directory; manifest order is plain string order
        files.sort();
        Ok(files)
    }

    fn open(&self, path: &RelativePath) -> Result<Box<dyn Read + '_>> {
        let native = path.to_native(&self.root);
        let file = File::open(&native).map_err(|source| Error::Source {
            source_name: self.name.clone(),
            path: path.to_string(),
            source,
        })?;
        Ok(Box::new(file))
    }
}
