//! Container runtime port.
//!
//! Everything the orchestrator needs from the container runtime: networks,
//! containers, and command execution inside a running container. Calls are
//! blocking; implementations report a non-zero exit as
//! [`SubprocessError`](crate::error::SubprocessError).

use std::path::PathBuf;

use crate::domain::membership::ClusterMembership;
use crate::domain::service::ServiceDescriptor;
use crate::error::Result;

/// Result of asking the runtime to create a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkCreation {
    Created,
    /// A network with this name already exists. Nothing was changed.
    AlreadyExists,
}

/// Result of asking the runtime to run a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Started; carries the container id.
    Started(String),
    /// A container with this name already exists. Nothing was changed.
    NameConflict,
}

/// A command to execute inside a running container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecRequest {
    pub command: Vec<String>,
    pub env: Vec<(String, String)>,
    pub workdir: Option<PathBuf>,
    /// Return as soon as the process is launched instead of waiting for it.
    pub detach: bool,
}

impl ExecRequest {
    #[must_use]
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.push((key.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn detached(mut self) -> Self {
        self.detach = true;
        self
    }

    /// The command as a single display string.
    #[must_use]
    pub fn display(&self) -> String {
        self.command.join(" ")
    }
}

/// Captured output of an attached execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Blocking interface to a container runtime.
pub trait ContainerRuntime {
    /// Create a bridge network named `name`.
    fn create_network(&self, name: &str) -> Result<NetworkCreation>;

    /// List containers attached to `name`, or `None` if there is no such
    /// network.
    fn inspect_network(&self, name: &str) -> Result<Option<ClusterMembership>>;

    /// Remove the network `name`.
    fn remove_network(&self, name: &str) -> Result<()>;

    /// Run a detached container for `service`.
    fn run_container(&self, service: &ServiceDescriptor) -> Result<RunOutcome>;

    /// Stop a container by id or name.
    fn stop_container(&self, container: &str) -> Result<()>;

    /// Remove a stopped container by id or name.
    fn remove_container(&self, container: &str) -> Result<()>;

    /// Execute a command inside a running container.
    ///
    /// A non-zero exit of the command is an error.
    fn exec(&self, container: &str, request: &ExecRequest) -> Result<ExecOutput>;
}

impl<R: ContainerRuntime + ?Sized> ContainerRuntime for &R {
    fn create_network(&self, name: &str) -> Result<NetworkCreation> {
        (**self).create_network(name)
    }

    fn inspect_network(&self, name: &str) -> Result<Option<ClusterMembership>> {
        (**self).inspect_network(name)
    }

    fn remove_network(&self, name: &str) -> Result<()> {
        (**self).remove_network(name)
    }

    fn run_container(&self, service: &ServiceDescriptor) -> Result<RunOutcome> {
        (**self).run_container(service)
    }

    fn stop_container(&self, container: &str) -> Result<()> {
        (**self).stop_container(container)
    }

    fn remove_container(&self, container: &str) -> Result<()> {
        (**self).remove_container(container)
    }

    fn exec(&self, container: &str, request: &ExecRequest) -> Result<ExecOutput> {
        (**self).exec(container, request)
    }
}
