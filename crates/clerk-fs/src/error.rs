//! Error types for clerk-fs

use std::path::PathBuf;

/// Result type for clerk-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in clerk-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid relative path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("invalid hex digest '{value}': {source}")]
    InvalidDigest {
        value: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying I/O error, if this is one.
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
