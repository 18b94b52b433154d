//! [`ContainerRuntime`] backed by the docker CLI.

use std::process::{Command, Output, Stdio};

use tracing::debug;

use super::args;
use super::dto::parse_membership;
use crate::domain::membership::ClusterMembership;
use crate::domain::service::ServiceDescriptor;
use crate::error::{Result, SubprocessError};
use crate::port::{ContainerRuntime, ExecOutput, ExecRequest, NetworkCreation, RunOutcome};

/// Environment variable overriding the docker binary.
pub const DOCKER_BIN_ENV: &str = "CLP_DOCKER_BIN";
const DEFAULT_DOCKER_BIN: &str = "docker";

/// Drives a docker-compatible CLI with blocking subprocesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_DOCKER_BIN)
    }
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `CLP_DOCKER_BIN` when set, `docker` otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(DOCKER_BIN_ENV) {
            Ok(program) if !program.trim().is_empty() => Self::new(program),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run to completion, capturing output. Non-zero exits are returned, not
    /// raised, so callers can classify them.
    fn output(&self, args: &[String]) -> Result<Output> {
        debug!(command = %args::redacted(&self.program, args), "Running docker");
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| {
                SubprocessError::Spawn {
                    program: self.program.clone(),
                    source,
                }
                .into()
            })
    }

    /// Run to completion; a non-zero exit is an error.
    fn run(&self, args: &[String]) -> Result<ExecOutput> {
        let output = self.output(args)?;
        if output.status.success() {
            Ok(captured(&output))
        } else {
            Err(self.failure(args, &output))
        }
    }

    fn failure(&self, args: &[String], output: &Output) -> crate::error::Error {
        SubprocessError::Failed {
            command: args::redacted(&self.program, args),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into()
    }
}

fn captured(output: &Output) -> ExecOutput {
    ExecOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

impl ContainerRuntime for DockerCli {
    fn create_network(&self, name: &str) -> Result<NetworkCreation> {
        let args = args::network_create(name);
        let output = self.output(&args)?;
        if output.status.success() {
            return Ok(NetworkCreation::Created);
        }
        if args::is_network_conflict(&String::from_utf8_lossy(&output.stderr)) {
            return Ok(NetworkCreation::AlreadyExists);
        }
        Err(self.failure(&args, &output))
    }

    fn inspect_network(&self, name: &str) -> Result<Option<ClusterMembership>> {
        let args = args::network_inspect(name);
        let output = self.output(&args)?;
        if output.status.success() {
            return parse_membership(&String::from_utf8_lossy(&output.stdout)).map(Some);
        }
        if args::is_missing_network(&String::from_utf8_lossy(&output.stderr)) {
            return Ok(None);
        }
        Err(self.failure(&args, &output))
    }

    fn remove_network(&self, name: &str) -> Result<()> {
        self.run(&args::network_remove(name)).map(drop)
    }

    fn run_container(&self, service: &ServiceDescriptor) -> Result<RunOutcome> {
        let args = args::run(service);
        let output = self.output(&args)?;
        if output.status.success() {
            let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Ok(RunOutcome::Started(id));
        }
        if args::is_name_conflict(&String::from_utf8_lossy(&output.stderr)) {
            return Ok(RunOutcome::NameConflict);
        }
        Err(self.failure(&args, &output))
    }

    fn stop_container(&self, container: &str) -> Result<()> {
        self.run(&args::stop(container)).map(drop)
    }

    fn remove_container(&self, container: &str) -> Result<()> {
        self.run(&args::remove(container)).map(drop)
    }

    fn exec(&self, container: &str, request: &ExecRequest) -> Result<ExecOutput> {
        self.run(&args::exec(container, request))
    }
}
