//! Atomic file writes with locking
//!
//! Every write goes to a sibling temp file first and is renamed over the
//! target, so a failed write never leaves a half-written file behind.

use crate::checksum::HashingWriter;
use crate::{Digest, Error, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

fn temp_path_for(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

/// Create a directory and all of its missing parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

fn open_locked_temp(temp_path: &Path, target: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    Ok(file)
}

fn commit(file: File, temp_path: &Path, target: &Path) -> Result<()> {
    file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    file.unlock().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;
    drop(file);
    fs::rename(temp_path, target).map_err(|e| Error::io(target, e))
}

/// Write content atomically to a file.
///
/// Creates missing parent directories.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = temp_path_for(path);
    let result = open_locked_temp(&temp_path, path).and_then(|mut file| {
        file.write_all(content)
            .map_err(|e| Error::io(&temp_path, e))?;
        commit(file, &temp_path, path)
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Stream a reader into a file atomically, returning the digest of the
/// bytes that were persisted.
///
/// The parent directory must already exist. On failure the previous content
/// of `path` is untouched and the temp file is removed.
pub fn write_stream(path: &Path, mut reader: impl Read) -> Result<Digest> {
    let temp_path = temp_path_for(path);
    let result = open_locked_temp(&temp_path, path).and_then(|file| {
        let mut writer = HashingWriter::new(file);
        std::io::copy(&mut reader, &mut writer).map_err(|e| Error::io(&temp_path, e))?;
        writer.flush().map_err(|e| Error::io(&temp_path, e))?;
        let (file, digest) = writer.finish();
        commit(file, &temp_path, path)?;
        Ok(digest)
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Remove a file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Read a whole file as text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
