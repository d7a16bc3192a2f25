//! Canonical relative paths
//!
//! Every path a source supplies or the manifest records goes through
//! [`RelativePath`], so that `a/b.txt`, `./a//b.txt` and `a\b.txt` all
//! compare equal and sort the same way.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A validated path relative to some root.
///
/// Internally uses forward slashes with no empty or `.` segments and no
/// leading or trailing slash. Never absolute, never contains `..`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath {
    inner: String,
}

impl RelativePath {
    /// Normalize and validate a path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is not valid UTF-8, is
    /// empty or absolute, escapes its root via `..`, or contains a line break.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.to_str() {
            Some(raw) => Self::parse(raw),
            None => Err(Error::InvalidPath {
                path: path.to_string_lossy().into_owned(),
                reason: "not valid UTF-8",
            }),
        }
    }

    fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidPath {
            path: raw.to_string(),
            reason,
        };

        if raw.contains(['\n', '\r']) {
            return Err(invalid("contains a line break"));
        }

        let unified = raw.replace('\\', "/");
        if unified.starts_with('/') || has_drive_prefix(&unified) {
            return Err(invalid("path is absolute"));
        }

        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(invalid("path escapes its root")),
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(invalid("path is empty"));
        }

        Ok(Self {
            inner: segments.join("/"),
        })
    }

    /// Get the normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Resolve this path under a native root directory.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        let mut native = root.to_path_buf();
        native.extend(self.inner.split('/'));
        native
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RelativePath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl TryFrom<&Path> for RelativePath {
    type Error = Error;

    fn try_from(p: &Path) -> Result<Self> {
        Self::new(p)
    }
}

impl std::str::FromStr for RelativePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a/b.txt", "a/b.txt")]
    #[case("./a/b.txt", "a/b.txt")]
    #[case("a//b.txt", "a/b.txt")]
    #[case("a/./b.txt", "a/b.txt")]
    #[case("a\\b.txt", "a/b.txt")]
    #[case("a/b/", "a/b")]
    #[case("name with spaces.txt", "name with spaces.txt")]
    fn normalizes_to_canonical_form(#[case] input: &str, #[case] expected: &str) {
        let path = RelativePath::new(input).unwrap();
        assert_eq!(path.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("./")]
    #[case("/etc/passwd")]
    #[case("\\server\\share")]
    #[case("C:/Windows")]
    #[case("../outside")]
    #[case("a/../../b")]
    #[case("a\nb")]
    fn rejects_invalid_paths(#[case] input: &str) {
        let result = RelativePath::new(input);
        assert!(
            matches!(result, Err(Error::InvalidPath { .. })),
            "expected '{}' to be rejected, got {:?}",
            input.escape_debug(),
            result
        );
    }

    #[test]
    fn equivalent_spellings_compare_equal() {
        let a = RelativePath::new("a/b.txt").unwrap();
        let b = RelativePath::new("./a//b.txt").unwrap();
        assert_eq!(a, b);
    }

    #[cfg(unix)]
    #[test]
    fn rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let result = RelativePath::new(Path::new(OsStr::from_bytes(b"z\xff")));
        assert!(matches!(
            result,
            Err(Error::InvalidPath { reason: "not valid UTF-8", .. })
        ));
    }

    #[test]
    fn to_native_joins_under_root() {
        let root = Path::new("/tmp/target");
        let path = RelativePath::new("a/b.txt").unwrap();
        assert_eq!(path.to_native(root), root.join("a").join("b.txt"));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut paths: Vec<RelativePath> = ["b", "a/z", "a", "a/b"]
            .into_iter()
            .map(|p| RelativePath::new(p).unwrap())
            .collect();
        paths.sort();
        let rendered: Vec<&str> = paths.iter().map(|p| p.as_str()).collect();
        assert_eq!(rendered, vec!["a", "a/b", "a/z", "b"]);
    }
}
