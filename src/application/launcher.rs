//! Starts one long-running service container.

use std::fs;

use tracing::info;

use crate::domain::service::{BindingKind, ServiceDescriptor};
use crate::error::{ConfigError, Error, Result};
use crate::port::{ContainerRuntime, RunOutcome};

/// Starts service containers; never adopts an existing one.
#[derive(Debug)]
pub struct ServiceLauncher<'a, R> {
    runtime: &'a R,
}

impl<'a, R: ContainerRuntime> ServiceLauncher<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    /// Create the descriptor's host directories and run its container.
    ///
    /// Returns the new container's id.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyProvisioned`] if a container with the same name
    ///   exists
    /// - [`ConfigError::InvalidValue`] if a bound file is missing on the host
    pub fn start(&self, descriptor: &ServiceDescriptor) -> Result<String> {
        for binding in &descriptor.volumes {
            match binding.kind {
                BindingKind::Directory => fs::create_dir_all(&binding.host)?,
                BindingKind::File if !binding.host.is_file() => {
                    return Err(ConfigError::InvalidValue {
                        field: "volumes",
                        reason: format!("{} is not a file", binding.host.display()),
                    }
                    .into());
                }
                BindingKind::File => {}
            }
        }

        match self.runtime.run_container(descriptor)? {
            RunOutcome::Started(id) => {
                info!(
                    service = %descriptor.role,
                    container = %descriptor.name,
                    image = %descriptor.image,
                    "Started container"
                );
                Ok(id)
            }
            RunOutcome::NameConflict => Err(Error::AlreadyProvisioned {
                cluster: descriptor.network.clone(),
                resource: format!("container '{}'", descriptor.name),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::{ServiceRole, VolumeBinding};
    use crate::testkit::runtime::FakeRuntime;

    #[test]
    fn start_creates_host_directories() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = FakeRuntime::new();
        runtime.add_network("c1");
        let data = dir.path().join("data").join("db");
        let descriptor = ServiceDescriptor::new(ServiceRole::Database, "c1", "mariadb")
            .volume(VolumeBinding::dir(&data, "/var/lib/mysql"));

        ServiceLauncher::new(&runtime).start(&descriptor).unwrap();

        assert!(data.is_dir());
        assert!(runtime.is_running("c1-db"));
    }

    #[test]
    fn start_refuses_existing_container() {
        let runtime = FakeRuntime::new();
        runtime.add_network("c1");
        let descriptor = ServiceDescriptor::new(ServiceRole::Queue, "c1", "rabbitmq");
        let launcher = ServiceLauncher::new(&runtime);

        launcher.start(&descriptor).unwrap();
        let result = launcher.start(&descriptor);

        match result {
            Err(Error::AlreadyProvisioned { cluster, resource }) => {
                assert_eq!(cluster, "c1");
                assert!(resource.contains("c1-queue"));
            }
            other => panic!("expected already provisioned, got {other:?}"),
        }
        assert_eq!(runtime.run_count(), 2);
    }

    #[test]
    fn start_requires_bound_files_to_exist() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = FakeRuntime::new();
        runtime.add_network("c1");
        let descriptor = ServiceDescriptor::new(ServiceRole::Queue, "c1", "rabbitmq")
            .volume(VolumeBinding::file(dir.path().join("missing.conf"), "/etc/q.conf"));

        let result = ServiceLauncher::new(&runtime).start(&descriptor);

        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(runtime.run_count(), 0);
    }
}
