//! Error types for clerk-core

use clerk_fs::RelativePath;
use std::path::PathBuf;

/// Result type for clerk-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in clerk-core operations
///
/// Every variant is fatal to the run that raised it. Declined confirmations
/// are not errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two sources in one aggregate supply the same path
    #[error("file '{path}' conflicts: supplied by both {existing} and {incoming}")]
    Collision {
        path: RelativePath,
        existing: String,
        incoming: String,
    },

    /// A source supplies a path the tool reserves for itself
    #[error("file '{path}' from {source_name} is reserved for the manifest")]
    ReservedPath {
        path: RelativePath,
        source_name: String,
    },

    /// A manifest line could not be parsed
    #[error("bad manifest {}: line {line}: {reason}", .path.display())]
    ManifestFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A manifest entry has no digest and cannot be persisted
    #[error("bad manifest: empty digest for '{entry}'")]
    ManifestIntegrity { entry: RelativePath },

    /// A directory under the target could not be created
    #[error("failed to make directory '{}': {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: clerk_fs::Error,
    },

    /// A managed file could not be written
    #[error("failed to write '{path}': {source}")]
    Write {
        path: RelativePath,
        #[source]
        source: clerk_fs::Error,
    },

    /// A stale managed file could not be removed
    #[error("failed to remove '{path}': {source}")]
    Removal {
        path: RelativePath,
        #[source]
        source: clerk_fs::Error,
    },

    /// A source could not be walked or opened
    #[error("source {source_name} failed at '{path}': {source}")]
    Source {
        source_name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error("failed to load config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Filesystem error from clerk-fs
    #[error(transparent)]
    Fs(#[from] clerk_fs::Error),
}
