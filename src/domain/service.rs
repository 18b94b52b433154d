//! Service container descriptors.
//!
//! Descriptors are rebuilt from the runtime config on every run and never
//! persisted.

use std::fmt;
use std::path::PathBuf;

/// The long-running services of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceRole {
    Database,
    Execution,
    Queue,
}

impl ServiceRole {
    /// Container name (and hostname) for this service in `cluster`.
    #[must_use]
    pub fn container_name(self, cluster: &str) -> String {
        match self {
            ServiceRole::Database => format!("{cluster}-db"),
            ServiceRole::Execution => cluster.to_string(),
            ServiceRole::Queue => format!("{cluster}-queue"),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ServiceRole::Database => "database",
            ServiceRole::Execution => "execution container",
            ServiceRole::Queue => "queue",
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the host side of a binding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// A directory, created on the host before the container starts.
    Directory,
    /// A single file that must already exist.
    File,
}

/// A host path bound into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeBinding {
    pub host: PathBuf,
    pub container: PathBuf,
    pub read_only: bool,
    pub kind: BindingKind,
}

impl VolumeBinding {
    #[must_use]
    pub fn dir(host: impl Into<PathBuf>, container: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
            read_only: false,
            kind: BindingKind::Directory,
        }
    }

    #[must_use]
    pub fn file(host: impl Into<PathBuf>, container: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
            read_only: false,
            kind: BindingKind::File,
        }
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// A port published on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

/// Everything needed to run one service container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub role: ServiceRole,
    pub name: String,
    pub hostname: String,
    pub network: String,
    pub image: String,
    pub command: Vec<String>,
    pub volumes: Vec<VolumeBinding>,
    pub env: Vec<(String, String)>,
    pub published_port: Option<PortMapping>,
    /// Keep stdin open so an idle shell entrypoint does not exit.
    pub interactive: bool,
    /// `uid:gid` to run as.
    pub user: Option<String>,
}

impl ServiceDescriptor {
    /// A descriptor whose name and hostname follow the cluster convention.
    #[must_use]
    pub fn new(role: ServiceRole, cluster: &str, image: impl Into<String>) -> Self {
        let name = role.container_name(cluster);
        Self {
            role,
            hostname: name.clone(),
            name,
            network: cluster.to_string(),
            image: image.into(),
            command: Vec::new(),
            volumes: Vec::new(),
            env: Vec::new(),
            published_port: None,
            interactive: false,
            user: None,
        }
    }

    #[must_use]
    pub fn env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.push((key.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn volume(mut self, binding: VolumeBinding) -> Self {
        self.volumes.push(binding);
        self
    }

    /// Look up an environment variable by key.
    #[must_use]
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_names_follow_cluster_convention() {
        assert_eq!(ServiceRole::Database.container_name("c1"), "c1-db");
        assert_eq!(ServiceRole::Execution.container_name("c1"), "c1");
        assert_eq!(ServiceRole::Queue.container_name("c1"), "c1-queue");
    }

    #[test]
    fn descriptor_uses_name_as_hostname_on_cluster_network() {
        let descriptor = ServiceDescriptor::new(ServiceRole::Queue, "c1", "rabbitmq")
            .env("A", "1")
            .volume(VolumeBinding::file("/h/q.conf", "/etc/q.conf").read_only());

        assert_eq!(descriptor.hostname, "c1-queue");
        assert_eq!(descriptor.network, "c1");
        assert_eq!(descriptor.env_value("A"), Some("1"));
        assert!(descriptor.volumes[0].read_only);
        assert_eq!(descriptor.volumes[0].kind, BindingKind::File);
    }
}
