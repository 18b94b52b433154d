//! Persisted runtime configuration file.
//!
//! The file's presence is the cluster's initialization marker. It is read
//! with a single open (no separate existence probe) and written with
//! create-new semantics so an existing file is never overwritten.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::runtime::RuntimeConfig;
use crate::domain::state::ClusterState;
use crate::error::{ConfigError, Result};

/// File name of the persisted config inside the cluster's state directory.
pub const RUNTIME_CONFIG_FILE: &str = "runtime-config.toml";

/// Location of one cluster's persisted [`RuntimeConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfigStore {
    path: PathBuf,
}

/// What happened when persisting a freshly synthesized config.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Written,
    /// Another writer got there first; carries the config now on disk.
    Existing(RuntimeConfig),
}

impl RuntimeConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `cluster` under `<install_root>/var/<cluster>/`.
    #[must_use]
    pub fn for_cluster(install_root: &Path, cluster: &str) -> Self {
        Self::new(
            install_root
                .join("var")
                .join(cluster)
                .join(RUNTIME_CONFIG_FILE),
        )
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current state.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn state(&self) -> Result<ClusterState> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                debug!(path = %self.path.display(), "Loaded persisted runtime config");
                Ok(ClusterState::Provisioned(RuntimeConfig::parse_toml(&content)?))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ClusterState::Uninitialized),
            Err(e) => Err(ConfigError::ReadFile(e).into()),
        }
    }

    /// Write `config` unless a file is already present.
    pub fn persist_new(&self, config: &RuntimeConfig) -> Result<PersistOutcome> {
        let rendered = config.to_toml()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => {
                file.write_all(rendered.as_bytes())?;
                file.sync_all()?;
                Ok(PersistOutcome::Written)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => match self.state()? {
                ClusterState::Provisioned(existing) => Ok(PersistOutcome::Existing(existing)),
                ClusterState::Uninitialized => Err(ConfigError::Other(format!(
                    "{} vanished while being written",
                    self.path.display()
                ))
                .into()),
            },
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::config::runtime_config;
    use crate::error::Error;

    #[test]
    fn missing_file_is_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuntimeConfigStore::for_cluster(dir.path(), "c1");
        assert_eq!(store.state().unwrap(), ClusterState::Uninitialized);
    }

    #[test]
    fn persist_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuntimeConfigStore::for_cluster(dir.path(), "c1");
        let config = runtime_config("c1", dir.path());

        assert_eq!(store.persist_new(&config).unwrap(), PersistOutcome::Written);
        assert_eq!(store.state().unwrap(), ClusterState::Provisioned(config));
        assert!(store.path().ends_with("var/c1/runtime-config.toml"));
    }

    #[test]
    fn persist_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuntimeConfigStore::for_cluster(dir.path(), "c1");
        let first = runtime_config("c1", dir.path());
        store.persist_new(&first).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let mut second = first.clone();
        second.database.password = "different".into();
        let outcome = store.persist_new(&second).unwrap();

        assert_eq!(outcome, PersistOutcome::Existing(first));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn corrupt_file_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuntimeConfigStore::for_cluster(dir.path(), "c1");
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "cluster_name = [").unwrap();

        assert!(matches!(
            store.state(),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }
}
