//! Canonical test configurations.
//!
//! Single source of truth for configs used across tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::application::readiness::RetryPolicy;
use crate::domain::runtime::{
    ArchiveOutputConfig, DatabaseConfig, ImageConfig, QueueConfig, RuntimeConfig,
    SchedulerConfig, DEFAULT_DATABASE_NAME, DEFAULT_DATABASE_PORT, DEFAULT_DATABASE_USER,
    DEFAULT_EXECUTION_IMAGE, DEFAULT_JOBS_POLL_DELAY, DEFAULT_QUEUE_IMAGE, DEFAULT_QUEUE_PORT,
    DEFAULT_QUEUE_USER,
};
use crate::domain::spec::{ArchiveOutputSpec, DatabaseEngine};

/// A runtime config with every directory inside `install_root` and fixed
/// passwords (`db-secret`, `queue-secret`).
pub fn runtime_config(name: &str, install_root: &Path) -> RuntimeConfig {
    let base = install_root.join("var").join(name);
    RuntimeConfig {
        cluster_name: name.to_string(),
        created_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc),
        publish_ports: false,
        input_logs_directory: PathBuf::from("/"),
        data_directory: base.join("data"),
        logs_directory: base.join("log"),
        database: DatabaseConfig {
            engine: DatabaseEngine::Mariadb,
            host: format!("{name}-db"),
            port: DEFAULT_DATABASE_PORT,
            name: DEFAULT_DATABASE_NAME.to_string(),
            username: DEFAULT_DATABASE_USER.to_string(),
            password: "db-secret".to_string(),
        },
        queue: QueueConfig {
            host: format!("{name}-queue"),
            port: DEFAULT_QUEUE_PORT,
            username: DEFAULT_QUEUE_USER.to_string(),
            password: "queue-secret".to_string(),
        },
        scheduler: SchedulerConfig {
            jobs_poll_delay: DEFAULT_JOBS_POLL_DELAY,
        },
        archive_output: ArchiveOutputConfig::from_spec(
            &ArchiveOutputSpec::default(),
            base.join("archives"),
        ),
        images: ImageConfig {
            execution: DEFAULT_EXECUTION_IMAGE.to_string(),
            database: DatabaseEngine::Mariadb.image().to_string(),
            queue: DEFAULT_QUEUE_IMAGE.to_string(),
        },
    }
}

/// Retry policy with `max_attempts` one second apart, as the real default
/// spaces them; pair it with a recording sleeper.
pub fn retry_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_secs(1))
}
