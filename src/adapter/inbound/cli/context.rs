//! Per-invocation context shared by the command handlers.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::command::Cli;
use super::diagnostic::ConfigDiagnostic;
use super::{output, paths};
use crate::adapter::outbound::docker::DockerCli;
use crate::application::{ClusterOrchestrator, ReadinessPoller, RetryPolicy};
use crate::domain::layout::InstallLayout;
use crate::domain::spec::ClusterSpec;
use crate::error::{ConfigError, Error, Result};
use crate::port::ThreadSleeper;

/// The orchestrator wired to the docker CLI and real sleeps.
pub type Orchestrator = ClusterOrchestrator<DockerCli, ThreadSleeper>;

/// Resolved install root and cluster spec.
#[derive(Debug, Clone)]
pub struct Context {
    pub install_root: PathBuf,
    pub config_path: PathBuf,
    pub spec: ClusterSpec,
}

impl Context {
    /// Resolve paths from the global flags and load the cluster spec.
    ///
    /// An explicit `--config` file must exist. The default file may be
    /// missing, in which case the built-in defaults apply.
    pub fn load(cli: &Cli) -> Result<Self> {
        let install_root = paths::install_root(cli.home.as_deref())?;
        let (config_path, explicit) = match &cli.config {
            Some(path) => (path.clone(), true),
            None => (paths::default_config(&install_root), false),
        };
        let spec = load_spec(&config_path, explicit)?;
        debug!(
            install_root = %install_root.display(),
            config = %config_path.display(),
            cluster = %spec.name,
            "Resolved context"
        );
        Ok(Self {
            install_root,
            config_path,
            spec,
        })
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(&self.install_root)
    }

    pub fn orchestrator(&self) -> Orchestrator {
        let poller = ReadinessPoller::new(RetryPolicy::default(), ThreadSleeper);
        ClusterOrchestrator::new(DockerCli::from_env(), poller, self.layout())
    }
}

fn load_spec(path: &Path, explicit: bool) -> Result<ClusterSpec> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound && !explicit => {
            debug!(config = %path.display(), "No cluster config file, using defaults");
            return Ok(ClusterSpec::default());
        }
        Err(e) => return Err(ConfigError::ReadFile(e).into()),
    };

    ClusterSpec::parse_toml(&content).map_err(|error| {
        if let Error::Config(ConfigError::Parse(toml_error)) = &error {
            if !output::is_json() {
                let diagnostic = ConfigDiagnostic::from_toml(path, &content, toml_error);
                eprintln!("{}", diagnostic.render(false));
            }
        }
        error
    })
}
