//! SHA-256 content digests
//!
//! A [`Digest`] is the raw hash output. The empty digest is a sentinel for
//! "could not be read" and never equals the digest of real content, so a
//! file that vanished is always seen as changed.

use sha2::{Digest as _, Sha256};
use std::io::Read;
use std::path::Path;

/// Raw digest bytes of some content.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// The sentinel digest for unreadable content.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Digest an in-memory buffer.
    pub fn of_bytes(content: impl AsRef<[u8]>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_ref());
        Self(hasher.finalize().to_vec())
    }

    /// Digest everything a reader yields.
    ///
    /// # Errors
    ///
    /// Returns the reader's error if it fails before EOF.
    pub fn of_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        std::io::copy(&mut reader, &mut hasher)?;
        Ok(Self(hasher.finalize().to_vec()))
    }

    /// Digest a file on disk.
    ///
    /// Returns [`Digest::empty`] if the file is missing, is not a regular
    /// file, or cannot be read to the end.
    pub fn of_file(path: &Path) -> Self {
        if !path.is_file() {
            return Self::empty();
        }
        match std::fs::File::open(path) {
            Ok(file) => Self::of_reader(file).unwrap_or_default(),
            Err(_) => Self::empty(),
        }
    }

    /// Decode a hex string (either case).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDigest`] on odd length or non-hex input.
    pub fn from_hex(value: &str) -> crate::Result<Self> {
        hex::decode(value)
            .map(Self)
            .map_err(|source| crate::Error::InvalidDigest {
                value: value.to_string(),
                source,
            })
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("Digest(<empty>)")
        } else {
            write!(f, "Digest({})", self.to_hex())
        }
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A writer adapter that hashes every byte it forwards.
///
/// Used to digest exactly what reaches the disk during a streamed copy.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
}

impl<W: std::io::Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Finish hashing and hand back the wrapped writer.
    pub fn finish(self) -> (W, Digest) {
        (self.inner, Digest(self.hasher.finalize().to_vec()))
    }
}

impl<W: std::io::Write> std::io::Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
