//! Filesystem primitives for clerk
//!
//! Provides canonical relative paths, content digests and the file
//! operations the reconciler builds on.

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::Digest;
pub use error::{Error, Result};
pub use path::RelativePath;
