//! Service descriptors derived from a [`RuntimeConfig`].

use std::path::PathBuf;

use crate::domain::layout::{
    InstallLayout, CONTAINER_ARCHIVES_DIR, CONTAINER_DATA_DIR, CONTAINER_INPUT_LOGS_DIR,
    CONTAINER_LOGS_DIR,
};
use crate::domain::runtime::RuntimeConfig;
use crate::domain::service::{PortMapping, ServiceDescriptor, ServiceRole, VolumeBinding};

const DATABASE_DATA_DIR: &str = "/var/lib/mysql";
const DATABASE_LOG_DIR: &str = "/var/log/mysql";
const QUEUE_CONFIG_PATH: &str = "/etc/rabbitmq/rabbitmq.conf";
const QUEUE_LOG_DIR: &str = "/var/log/rabbitmq";

/// Python packages shipped in the install tree.
pub const PYTHON_PACKAGES_DIR: &str = "lib/python3/site-packages";

/// Container-view runtime config, written to the logs directory on start.
pub const CONTAINER_CONFIG_FILE: &str = ".runtime-config.toml";

/// Builds the descriptors for one cluster.
#[derive(Debug, Clone, Copy)]
pub struct ServiceCatalog<'a> {
    config: &'a RuntimeConfig,
    layout: &'a InstallLayout,
}

impl<'a> ServiceCatalog<'a> {
    #[must_use]
    pub fn new(config: &'a RuntimeConfig, layout: &'a InstallLayout) -> Self {
        Self { config, layout }
    }

    #[must_use]
    pub fn config(&self) -> &'a RuntimeConfig {
        self.config
    }

    #[must_use]
    pub fn layout(&self) -> &'a InstallLayout {
        self.layout
    }

    fn cluster(&self) -> &str {
        &self.config.cluster_name
    }

    /// Host directory holding the database's on-disk files.
    #[must_use]
    pub fn database_data_dir(&self) -> PathBuf {
        self.config.data_directory.join("db")
    }

    /// Host directory for broker logs and its generated config file.
    #[must_use]
    pub fn queue_dir(&self) -> PathBuf {
        self.config.logs_directory.join("queue")
    }

    /// Host path of the generated broker config file.
    #[must_use]
    pub fn queue_config_path(&self) -> PathBuf {
        self.queue_dir().join("rabbitmq.conf")
    }

    /// Host path of the container-view runtime config.
    #[must_use]
    pub fn runtime_config_host_path(&self) -> PathBuf {
        self.config.logs_directory.join(CONTAINER_CONFIG_FILE)
    }

    /// The same file as seen from the execution container.
    #[must_use]
    pub fn runtime_config_container_path(&self) -> PathBuf {
        self.config
            .container_view(self.layout)
            .logs_directory
            .join(CONTAINER_CONFIG_FILE)
    }

    #[must_use]
    pub fn database(&self) -> ServiceDescriptor {
        let db = &self.config.database;
        let mut descriptor =
            ServiceDescriptor::new(ServiceRole::Database, self.cluster(), &self.config.images.database)
                .env("MYSQL_ROOT_PASSWORD", &db.password)
                .env("MYSQL_USER", &db.username)
                .env("MYSQL_PASSWORD", &db.password)
                .env("MYSQL_DATABASE", &db.name)
                .volume(VolumeBinding::dir(self.database_data_dir(), DATABASE_DATA_DIR))
                .volume(VolumeBinding::dir(
                    self.config.logs_directory.join("db"),
                    DATABASE_LOG_DIR,
                ));
        descriptor.command = vec![format!("--port={}", db.port)];
        if self.config.publish_ports {
            descriptor.published_port = Some(PortMapping {
                host: db.port,
                container: db.port,
            });
        }
        descriptor
    }

    /// The execution container.
    ///
    /// The install tree and input directory are always mounted; data, logs
    /// and archive directories only when they lie outside the install tree.
    #[must_use]
    pub fn execution(&self, user: Option<String>) -> ServiceDescriptor {
        let container_root = self.layout.container_root();
        let mut descriptor = ServiceDescriptor::new(
            ServiceRole::Execution,
            self.cluster(),
            &self.config.images.execution,
        )
        .env("CLP_HOME", container_root.display().to_string())
        .env(
            "PYTHONPATH",
            container_root.join(PYTHON_PACKAGES_DIR).display().to_string(),
        )
        .volume(VolumeBinding::dir(self.layout.host_root(), container_root))
        .volume(
            VolumeBinding::dir(&self.config.input_logs_directory, CONTAINER_INPUT_LOGS_DIR)
                .read_only(),
        );

        for (host, mount_point) in [
            (&self.config.data_directory, CONTAINER_DATA_DIR),
            (&self.config.logs_directory, CONTAINER_LOGS_DIR),
            (&self.config.archive_output.directory, CONTAINER_ARCHIVES_DIR),
        ] {
            let placement = self.layout.place(host, mount_point);
            if placement.needs_binding() {
                descriptor = descriptor.volume(VolumeBinding::dir(
                    host.as_path(),
                    placement.container_path(),
                ));
            }
        }

        descriptor.interactive = true;
        descriptor.user = user;
        descriptor
    }

    #[must_use]
    pub fn queue(&self) -> ServiceDescriptor {
        let queue = &self.config.queue;
        let mut descriptor =
            ServiceDescriptor::new(ServiceRole::Queue, self.cluster(), &self.config.images.queue)
                .volume(VolumeBinding::file(self.queue_config_path(), QUEUE_CONFIG_PATH).read_only())
                .volume(VolumeBinding::dir(self.queue_dir(), QUEUE_LOG_DIR));
        if self.config.publish_ports {
            descriptor.published_port = Some(PortMapping {
                host: queue.port,
                container: queue.port,
            });
        }
        descriptor
    }

    /// Broker configuration file content.
    #[must_use]
    pub fn queue_config(&self) -> String {
        let queue = &self.config.queue;
        format!(
            "listeners.tcp.default = {}\n\
             default_user = {}\n\
             default_pass = {}\n\
             log.file = {}/rabbitmq.log\n",
            queue.port, queue.username, queue.password, QUEUE_LOG_DIR
        )
    }
}
