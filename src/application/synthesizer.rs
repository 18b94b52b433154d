//! Config synthesis: [`ClusterSpec`] + derived defaults into a persisted
//! [`RuntimeConfig`].
//!
//! Credentials are random and not recoverable, so a persisted config is
//! always reused verbatim. Synthesis only happens when the caller intends to
//! initialize the cluster.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::PathBuf;
use tracing::info;

use crate::domain::layout::InstallLayout;
use crate::domain::runtime::{
    ArchiveOutputConfig, DatabaseConfig, ImageConfig, QueueConfig, RuntimeConfig,
    SchedulerConfig, DEFAULT_DATABASE_NAME, DEFAULT_DATABASE_PORT, DEFAULT_DATABASE_USER,
    DEFAULT_EXECUTION_IMAGE, DEFAULT_JOBS_POLL_DELAY, DEFAULT_QUEUE_IMAGE, DEFAULT_QUEUE_PORT,
    DEFAULT_QUEUE_USER,
};
use crate::domain::service::ServiceRole;
use crate::domain::spec::ClusterSpec;
use crate::domain::state::ClusterState;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::store::{PersistOutcome, RuntimeConfigStore};

const PASSWORD_LENGTH: usize = 20;

/// Why the caller needs a runtime config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Bringing the cluster up; synthesis is allowed.
    Initialize,
    /// Using an existing cluster; synthesis is not allowed.
    Use,
}

/// Resolve the runtime config for `spec`, synthesizing and persisting it
/// only when none exists and `intent` is [`Intent::Initialize`].
///
/// Returns the config and whether it was freshly synthesized.
///
/// # Errors
///
/// - [`ConfigError::NotInitialized`] when nothing is persisted and the
///   intent is [`Intent::Use`]
/// - [`ConfigError::Parse`] when the persisted file is malformed
/// - [`ConfigError::InvalidValue`] when the persisted file belongs to a
///   different cluster
pub fn resolve(
    spec: &ClusterSpec,
    layout: &InstallLayout,
    store: &RuntimeConfigStore,
    intent: Intent,
) -> Result<(RuntimeConfig, bool)> {
    match store.state()? {
        ClusterState::Provisioned(config) => {
            check_cluster_name(spec, &config)?;
            Ok((config, false))
        }
        ClusterState::Uninitialized => match intent {
            Intent::Use => Err(ConfigError::NotInitialized {
                cluster: spec.name.clone(),
            }
            .into()),
            Intent::Initialize => {
                let config = synthesize(spec, layout);
                match store.persist_new(&config)? {
                    PersistOutcome::Written => {
                        info!(
                            cluster = %spec.name,
                            path = %store.path().display(),
                            "Synthesized runtime config"
                        );
                        Ok((config, true))
                    }
                    PersistOutcome::Existing(existing) => {
                        check_cluster_name(spec, &existing)?;
                        Ok((existing, false))
                    }
                }
            }
        },
    }
}

fn check_cluster_name(spec: &ClusterSpec, config: &RuntimeConfig) -> Result<()> {
    if config.cluster_name != spec.name {
        return Err(ConfigError::InvalidValue {
            field: "cluster_name",
            reason: format!(
                "persisted config belongs to '{}', not '{}'",
                config.cluster_name, spec.name
            ),
        }
        .into());
    }
    Ok(())
}

/// Build a fresh runtime config with new random credentials.
#[must_use]
pub fn synthesize(spec: &ClusterSpec, layout: &InstallLayout) -> RuntimeConfig {
    let cluster_root = cluster_root(layout, &spec.name);
    let data_directory = spec
        .data_directory
        .clone()
        .unwrap_or_else(|| cluster_root.join("data"));
    let logs_directory = spec
        .logs_directory
        .clone()
        .unwrap_or_else(|| cluster_root.join("log"));
    let archive_directory = spec
        .archive_output
        .directory
        .clone()
        .unwrap_or_else(|| cluster_root.join("archives"));

    RuntimeConfig {
        cluster_name: spec.name.clone(),
        created_at: Utc::now(),
        publish_ports: spec.publish_ports,
        input_logs_directory: spec.input_logs_directory.clone(),
        data_directory,
        logs_directory,
        database: DatabaseConfig {
            engine: spec.database.engine,
            host: ServiceRole::Database.container_name(&spec.name),
            port: spec.database.port.unwrap_or(DEFAULT_DATABASE_PORT),
            name: spec
                .database
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            username: DEFAULT_DATABASE_USER.to_string(),
            password: generate_password(),
        },
        queue: QueueConfig {
            host: ServiceRole::Queue.container_name(&spec.name),
            port: spec.queue.port.unwrap_or(DEFAULT_QUEUE_PORT),
            username: DEFAULT_QUEUE_USER.to_string(),
            password: generate_password(),
        },
        scheduler: SchedulerConfig {
            jobs_poll_delay: spec
                .scheduler
                .jobs_poll_delay
                .unwrap_or(DEFAULT_JOBS_POLL_DELAY),
        },
        archive_output: ArchiveOutputConfig::from_spec(&spec.archive_output, archive_directory),
        images: ImageConfig {
            execution: spec
                .images
                .execution
                .clone()
                .unwrap_or_else(|| DEFAULT_EXECUTION_IMAGE.to_string()),
            database: spec
                .images
                .database
                .clone()
                .unwrap_or_else(|| spec.database.engine.image().to_string()),
            queue: spec
                .images
                .queue
                .clone()
                .unwrap_or_else(|| DEFAULT_QUEUE_IMAGE.to_string()),
        },
    }
}

/// Per-cluster subtree under the install tree.
#[must_use]
pub fn cluster_root(layout: &InstallLayout, cluster: &str) -> PathBuf {
    layout.host_root().join("var").join(cluster)
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
