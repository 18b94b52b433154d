//! User-supplied cluster specification.
//!
//! A [`ClusterSpec`] is the small declarative input a user writes. Every
//! field except `name` has a default, so an empty file describes a valid
//! cluster named `clp`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::infrastructure::config::logging::LoggingConfig;

/// Default cluster name when the spec does not set one.
pub const DEFAULT_CLUSTER_NAME: &str = "clp";

/// Supported relational database engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    #[default]
    Mariadb,
    Mysql,
}

impl DatabaseEngine {
    /// Container image used for this engine.
    #[must_use]
    pub const fn image(self) -> &'static str {
        match self {
            DatabaseEngine::Mariadb => "mariadb:10.6",
            DatabaseEngine::Mysql => "mysql:8.0",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DatabaseEngine::Mariadb => "mariadb",
            DatabaseEngine::Mysql => "mysql",
        }
    }
}

/// Database section of the spec.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSpec {
    #[serde(default, rename = "type")]
    pub engine: DatabaseEngine,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Message broker section of the spec.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueSpec {
    #[serde(default)]
    pub port: Option<u16>,
}

/// Scheduler section of the spec.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerSpec {
    /// Seconds between scheduler polls of the jobs table.
    #[serde(default)]
    pub jobs_poll_delay: Option<f64>,
}

/// Sizing parameters for compressed archive output.
///
/// Sizes are in bytes and are passed straight through to the compressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveOutputSpec {
    /// Host directory for archives. Defaults to a cluster-namespaced path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_target_archive_size")]
    pub target_archive_size: u64,
    #[serde(default = "default_target_dictionaries_size")]
    pub target_dictionaries_size: u64,
    #[serde(default = "default_target_encoded_file_size")]
    pub target_encoded_file_size: u64,
    #[serde(default = "default_target_segment_size")]
    pub target_segment_size: u64,
}

fn default_target_archive_size() -> u64 {
    256 * 1024 * 1024
}

fn default_target_dictionaries_size() -> u64 {
    32 * 1024 * 1024
}

fn default_target_encoded_file_size() -> u64 {
    256 * 1024 * 1024
}

fn default_target_segment_size() -> u64 {
    256 * 1024 * 1024
}

impl Default for ArchiveOutputSpec {
    fn default() -> Self {
        Self {
            directory: None,
            target_archive_size: default_target_archive_size(),
            target_dictionaries_size: default_target_dictionaries_size(),
            target_encoded_file_size: default_target_encoded_file_size(),
            target_segment_size: default_target_segment_size(),
        }
    }
}

/// Container image overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSpec {
    #[serde(default)]
    pub execution: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub queue: Option<String>,
}

/// Declarative cluster description loaded once per invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterSpec {
    /// Cluster name: network name, execution container name and hostname.
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory holding logs to compress; mounted read-only.
    #[serde(default = "default_input_logs_directory")]
    pub input_logs_directory: PathBuf,

    #[serde(default)]
    pub data_directory: Option<PathBuf>,

    #[serde(default)]
    pub logs_directory: Option<PathBuf>,

    /// Publish service ports on the host (distributed mode).
    #[serde(default)]
    pub publish_ports: bool,

    #[serde(default)]
    pub database: DatabaseSpec,

    #[serde(default)]
    pub queue: QueueSpec,

    #[serde(default)]
    pub scheduler: SchedulerSpec,

    #[serde(default)]
    pub archive_output: ArchiveOutputSpec,

    #[serde(default)]
    pub images: ImageSpec,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_name() -> String {
    DEFAULT_CLUSTER_NAME.to_string()
}

fn default_input_logs_directory() -> PathBuf {
    PathBuf::from("/")
}

impl Default for ClusterSpec {
    fn default() -> Self {
        Self {
            name: default_name(),
            input_logs_directory: default_input_logs_directory(),
            data_directory: None,
            logs_directory: None,
            publish_ports: false,
            database: DatabaseSpec::default(),
            queue: QueueSpec::default(),
            scheduler: SchedulerSpec::default(),
            archive_output: ArchiveOutputSpec::default(),
            images: ImageSpec::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClusterSpec {
    /// A default spec with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a spec from TOML content and validate it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the content is malformed or a value is
    /// out of range.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let spec: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load a spec from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate field values.
    ///
    /// The cluster name doubles as a container and network name, so it is
    /// restricted to characters the container runtime accepts.
    pub fn validate(&self) -> Result<()> {
        validate_cluster_name(&self.name)?;

        if !self.input_logs_directory.is_absolute() {
            return Err(ConfigError::InvalidValue {
                field: "input_logs_directory",
                reason: "must be an absolute path".to_string(),
            }
            .into());
        }

        for (field, dir) in [
            ("data_directory", &self.data_directory),
            ("logs_directory", &self.logs_directory),
            ("archive_output.directory", &self.archive_output.directory),
        ] {
            if matches!(dir, Some(path) if !path.is_absolute()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be an absolute path".to_string(),
                }
                .into());
            }
        }

        if matches!(self.database.port, Some(0)) {
            return Err(ConfigError::InvalidValue {
                field: "database.port",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if matches!(self.queue.port, Some(0)) {
            return Err(ConfigError::InvalidValue {
                field: "queue.port",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if matches!(self.scheduler.jobs_poll_delay, Some(delay) if delay <= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.jobs_poll_delay",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let archive = &self.archive_output;
        for (field, size) in [
            ("archive_output.target_archive_size", archive.target_archive_size),
            (
                "archive_output.target_dictionaries_size",
                archive.target_dictionaries_size,
            ),
            (
                "archive_output.target_encoded_file_size",
                archive.target_encoded_file_size,
            ),
            ("archive_output.target_segment_size", archive.target_segment_size),
        ] {
            if size == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Check that a cluster name is usable as a network and container name.
pub fn validate_cluster_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigError::MissingField { field: "name" }.into());
    }
    let first_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !first_ok || !rest_ok {
        return Err(ConfigError::InvalidValue {
            field: "name",
            reason: format!(
                "'{name}' must start with a letter or digit and contain only [A-Za-z0-9_.-]"
            ),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_spec_uses_defaults() {
        let spec = ClusterSpec::parse_toml("").unwrap();
        assert_eq!(spec.name, "clp");
        assert_eq!(spec.database.engine, DatabaseEngine::Mariadb);
        assert_eq!(spec.archive_output.target_dictionaries_size, 32 * 1024 * 1024);
        assert!(!spec.publish_ports);
    }

    #[test]
    fn parses_full_spec() {
        let spec = ClusterSpec::parse_toml(
            r#"
name = "c1"
input_logs_directory = "/srv/logs"
publish_ports = true

[database]
type = "mysql"
port = 3307

[archive_output]
target_segment_size = 1024
"#,
        )
        .unwrap();

        assert_eq!(spec.name, "c1");
        assert_eq!(spec.database.engine, DatabaseEngine::Mysql);
        assert_eq!(spec.database.port, Some(3307));
        assert_eq!(spec.archive_output.target_segment_size, 1024);
        assert_eq!(spec.database.engine.image(), "mysql:8.0");
    }

    #[test]
    fn rejects_unknown_database_engine() {
        let result = ClusterSpec::parse_toml("[database]\ntype = \"postgres\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn rejects_bad_cluster_names() {
        for name in ["", "-lead", "has space", "slash/name"] {
            let spec = ClusterSpec::named(name);
            assert!(spec.validate().is_err(), "accepted {name:?}");
        }
        assert!(ClusterSpec::named("c1.prod_a-b").validate().is_ok());
    }

    #[test]
    fn rejects_relative_directories() {
        let result = ClusterSpec::parse_toml("data_directory = \"var/data\"\n");
        match result {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, "data_directory");
            }
            other => panic!("expected invalid data_directory, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_archive_sizes() {
        let result = ClusterSpec::parse_toml("[archive_output]\ntarget_archive_size = 0\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "archive_output.target_archive_size",
                ..
            }))
        ));
    }
}
