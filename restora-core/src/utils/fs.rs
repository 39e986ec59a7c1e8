//! Filesystem utilities.

use crate::error::CoreError;
use std::fs;
use std::path::Path;

/// Ensures that a directory exists at the given path, creating it and any
/// missing parents if necessary.
///
/// # Errors
///
/// Returns [`CoreError::Filesystem`] if the path exists but is not a
/// directory, or if creation fails.
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if path.is_dir() {
            Ok(())
        } else {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path occupied by a non-directory",
                ),
            })
        }
    } else {
        fs::create_dir_all(path).map_err(|source| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_directory_with_parents() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b/c");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn existing_directory_is_fine() {
        let temp = TempDir::new().unwrap();
        ensure_dir_exists(temp.path()).unwrap();
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            ensure_dir_exists(&file),
            Err(CoreError::Filesystem { .. })
        ));
    }
}
