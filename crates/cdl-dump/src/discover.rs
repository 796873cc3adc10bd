//! Locating the dump document under a search root.
//!
//! An instrumented run leaves exactly one dump file somewhere below its
//! output directory. Discovery walks the whole tree rather than
//! stopping at the first hit, so a stray second dump file is reported
//! instead of silently shadowed.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// File name the dump writer uses.
pub const DUMP_FILE_NAME: &str = "cdl_dump.yaml";

/// Failure to resolve a search root to exactly one dump file.
#[derive(Debug)]
pub enum DiscoverError {
    /// No dump file below the search root.
    NotFound {
        /// The search root that was walked.
        root: PathBuf,
    },
    /// More than one dump file below the search root.
    Ambiguous {
        /// The first match.
        first: PathBuf,
        /// The second match.
        second: PathBuf,
    },
    /// A directory could not be read while walking.
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

impl std::fmt::Display for DiscoverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoverError::NotFound { root } => {
                write!(f, "no {} under {}", DUMP_FILE_NAME, root.display())
            }
            DiscoverError::Ambiguous { first, second } => {
                write!(
                    f,
                    "multiple dump files: {} and {}",
                    first.display(),
                    second.display()
                )
            }
            DiscoverError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for DiscoverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoverError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolve `root` to the unique dump file below it.
pub fn find_dump_file(root: &Path) -> Result<PathBuf, DiscoverError> {
    let mut found = None;
    walk(root, &mut found)?;
    found.ok_or_else(|| DiscoverError::NotFound {
        root: root.to_owned(),
    })
}

fn walk(dir: &Path, found: &mut Option<PathBuf>) -> Result<(), DiscoverError> {
    let io = |source| DiscoverError::Io {
        path: dir.to_owned(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io)? {
        let entry = entry.map_err(io)?;
        let path = entry.path();
        if entry.file_type().map_err(io)?.is_dir() {
            walk(&path, found)?;
        } else if path.file_name() == Some(OsStr::new(DUMP_FILE_NAME)) {
            match found {
                Some(first) => {
                    return Err(DiscoverError::Ambiguous {
                        first: first.clone(),
                        second: path,
                    });
                }
                None => {
                    tracing::debug!(path = %path.display(), "found dump file");
                    *found = Some(path);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_nested_dump_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("run-1").join("out");
        fs::create_dir_all(&nested).unwrap();
        let dump = nested.join(DUMP_FILE_NAME);
        fs::write(&dump, "version: \"1\"").unwrap();
        fs::write(nested.join("other.yaml"), "ignored").unwrap();

        assert_eq!(find_dump_file(dir.path()).unwrap(), dump);
    }

    #[test]
    fn test_zero_matches_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_dump_file(dir.path()).unwrap_err();
        assert!(matches!(err, DiscoverError::NotFound { .. }));
    }

    #[test]
    fn test_two_matches_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join(DUMP_FILE_NAME), "").unwrap();
        fs::write(b.join(DUMP_FILE_NAME), "").unwrap();

        let err = find_dump_file(dir.path()).unwrap_err();
        assert!(matches!(err, DiscoverError::Ambiguous { .. }));
    }
}
