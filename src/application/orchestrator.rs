//! Cluster lifecycle: start, stop and status for one named cluster.
//!
//! Start runs a validated [`StartPlan`] step by step. A failing step aborts
//! the rest and leaves whatever already started running; `stop` is the
//! recovery path.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::launcher::ServiceLauncher;
use super::network;
use super::process::ProcessLauncher;
use super::readiness::ReadinessPoller;
use super::schema::SchemaInitializer;
use super::services::ServiceCatalog;
use super::synthesizer::{self, Intent};
use super::teardown::{self, TeardownReport};
use crate::domain::layout::InstallLayout;
use crate::domain::membership::ClusterMembership;
use crate::domain::plan::{StartPlan, StartStep};
use crate::domain::runtime::RuntimeConfig;
use crate::domain::service::ServiceDescriptor;
use crate::domain::spec::{validate_cluster_name, ClusterSpec};
use crate::error::Result;
use crate::infrastructure::config::store::RuntimeConfigStore;
use crate::infrastructure::host;
use crate::port::{ContainerRuntime, Sleeper};

/// A service container started during `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartedContainer {
    pub service: String,
    pub name: String,
    pub id: String,
}

/// Outcome of a successful `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartReport {
    pub cluster: String,
    pub config_path: PathBuf,
    /// Whether the runtime config was created by this start.
    pub config_synthesized: bool,
    pub containers: Vec<StartedContainer>,
    pub worker_concurrency: usize,
    pub steps: Vec<&'static str>,
}

/// Drives the lifecycle of clusters sharing one install tree.
#[derive(Debug)]
pub struct ClusterOrchestrator<R, S> {
    runtime: R,
    poller: ReadinessPoller<S>,
    layout: InstallLayout,
    plan: StartPlan,
    worker_concurrency: usize,
    user: Option<String>,
}

impl<R: ContainerRuntime, S: Sleeper> ClusterOrchestrator<R, S> {
    /// An orchestrator with the full start plan, one worker per logical CPU
    /// and the execution container running as the invoking user.
    pub fn new(runtime: R, poller: ReadinessPoller<S>, layout: InstallLayout) -> Self {
        Self {
            runtime,
            poller,
            layout,
            plan: StartPlan::default(),
            worker_concurrency: host::logical_cpus(),
            user: host::current_user(),
        }
    }

    #[must_use]
    pub fn with_plan(mut self, plan: StartPlan) -> Self {
        self.plan = plan;
        self
    }

    #[must_use]
    pub fn with_worker_concurrency(mut self, concurrency: usize) -> Self {
        self.worker_concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Persisted config location for `cluster`.
    #[must_use]
    pub fn store(&self, cluster: &str) -> RuntimeConfigStore {
        RuntimeConfigStore::for_cluster(self.layout.host_root(), cluster)
    }

    /// Bring the cluster described by `spec` up.
    ///
    /// # Errors
    ///
    /// Every error names the cluster. Nothing external is touched when the
    /// spec or plan is invalid or the cluster network already exists.
    pub fn start(&self, spec: &ClusterSpec) -> Result<StartReport> {
        self.start_with_progress(spec, |_| {})
    }

    /// Like [`start`](Self::start), calling `on_step` before each step runs.
    pub fn start_with_progress<F>(&self, spec: &ClusterSpec, mut on_step: F) -> Result<StartReport>
    where
        F: FnMut(StartStep),
    {
        self.start_inner(spec, &mut on_step)
            .map_err(|e| e.in_cluster(&spec.name))
    }

    fn start_inner(
        &self,
        spec: &ClusterSpec,
        on_step: &mut dyn FnMut(StartStep),
    ) -> Result<StartReport> {
        spec.validate()?;
        self.plan.validate()?;
        let cluster = spec.name.as_str();

        network::ensure_absent(&self.runtime, cluster)?;

        let store = self.store(cluster);
        let (config, synthesized) =
            synthesizer::resolve(spec, &self.layout, &store, Intent::Initialize)?;
        let catalog = ServiceCatalog::new(&config, &self.layout);
        write_file(
            &catalog.runtime_config_host_path(),
            &config.container_view(&self.layout).to_toml()?,
        )?;

        let mut report = StartReport {
            cluster: cluster.to_string(),
            config_path: store.path().to_path_buf(),
            config_synthesized: synthesized,
            containers: Vec::new(),
            worker_concurrency: self.worker_concurrency,
            steps: Vec::new(),
        };

        for &step in self.plan.steps() {
            on_step(step);
            debug!(cluster, step = %step, "Running start step");
            self.run_step(step, &catalog, &mut report)?;
            report.steps.push(step.name());
        }

        info!(cluster, containers = report.containers.len(), "Cluster started");
        Ok(report)
    }

    fn run_step(
        &self,
        step: StartStep,
        catalog: &ServiceCatalog<'_>,
        report: &mut StartReport,
    ) -> Result<()> {
        let config = catalog.config();
        match step {
            StartStep::CreateNetwork => network::provision(&self.runtime, &config.cluster_name),
            StartStep::StartDatabase => self.launch(&catalog.database(), report),
            StartStep::StartExecutionContainer => {
                self.launch(&catalog.execution(self.user.clone()), report)
            }
            StartStep::StartQueue => {
                write_file(&catalog.queue_config_path(), &catalog.queue_config())?;
                self.launch(&catalog.queue(), report)
            }
            StartStep::InitializeSchema => SchemaInitializer::new(&self.runtime, &self.poller)
                .initialize(config.execution_container(), catalog),
            StartStep::StartScheduler => {
                ProcessLauncher::new(&self.runtime, catalog).launch_scheduler()
            }
            StartStep::StartWorkers => ProcessLauncher::new(&self.runtime, catalog)
                .launch_workers(self.worker_concurrency),
        }
    }

    fn launch(&self, descriptor: &ServiceDescriptor, report: &mut StartReport) -> Result<()> {
        let id = ServiceLauncher::new(&self.runtime).start(descriptor)?;
        report.containers.push(StartedContainer {
            service: descriptor.role.label().to_string(),
            name: descriptor.name.clone(),
            id,
        });
        Ok(())
    }

    /// Tear `cluster` down by network membership.
    ///
    /// # Errors
    ///
    /// [`Error::NotProvisioned`](crate::error::Error::NotProvisioned) if the
    /// cluster network does not exist.
    pub fn stop(&self, cluster: &str) -> Result<TeardownReport> {
        validate_cluster_name(cluster)?;
        teardown::teardown(&self.runtime, cluster).map_err(|e| e.in_cluster(cluster))
    }

    /// Current members of `cluster`, or `None` if it is not running.
    pub fn status(&self, cluster: &str) -> Result<Option<ClusterMembership>> {
        validate_cluster_name(cluster)?;
        network::membership(&self.runtime, cluster).map_err(|e| e.in_cluster(cluster))
    }

    /// The persisted runtime config of an initialized cluster.
    pub fn runtime_config(&self, spec: &ClusterSpec) -> Result<RuntimeConfig> {
        let store = self.store(&spec.name);
        synthesizer::resolve(spec, &self.layout, &store, Intent::Use)
            .map(|(config, _)| config)
            .map_err(|e| e.in_cluster(&spec.name))
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
