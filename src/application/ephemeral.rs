//! Scoped temporary files handed to dispatched commands.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;

/// A file that is removed when the guard is dropped, on success and error
/// paths alike.
#[derive(Debug)]
pub struct EphemeralFile {
    path: PathBuf,
}

impl EphemeralFile {
    /// Create `<dir>/.<uuid>-<suffix>` holding `contents`.
    pub fn create(dir: &Path, suffix: &str, contents: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!(".{}-{suffix}", Uuid::new_v4()));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        // Guard exists before the write so a failed write still cleans up.
        let guard = Self { path };
        file.write_all(contents.as_bytes())?;
        debug!(path = %guard.path.display(), "Wrote ephemeral file");
        Ok(guard)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for EphemeralFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove ephemeral file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let file = EphemeralFile::create(dir.path(), "paths.txt", "/a\n/b\n").unwrap();
        let path = file.path().to_path_buf();

        assert_eq!(fs::read_to_string(&path).unwrap(), "/a\n/b\n");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with('.'));
        assert!(name.ends_with("-paths.txt"));

        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn file_is_removed_when_scope_exits_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut seen = None;

        let result: Result<()> = (|| {
            let file = EphemeralFile::create(dir.path(), "db-config.toml", "x = 1")?;
            seen = Some(file.path().to_path_buf());
            Err(std::io::Error::other("dispatch failed").into())
        })();

        assert!(result.is_err());
        assert!(!seen.unwrap().exists());
    }

    #[test]
    fn names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = EphemeralFile::create(dir.path(), "paths.txt", "").unwrap();
        let b = EphemeralFile::create(dir.path(), "paths.txt", "").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
