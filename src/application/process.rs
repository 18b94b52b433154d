//! Scheduler and worker processes inside the execution container.
//!
//! Both are launched detached and are not supervised afterwards.

use tracing::info;

use super::services::{ServiceCatalog, PYTHON_PACKAGES_DIR};
use crate::error::Result;
use crate::port::{ContainerRuntime, ExecRequest};

const SCHEDULER_MODULE: &str = "job_orchestration.scheduler.scheduler";
const WORKER_APP: &str = "job_orchestration.executor";
const WORKER_QUEUE: &str = "compression";
const WORKER_LOG_LEVEL: &str = "WARNING";

/// Launches processes in a cluster's execution container.
#[derive(Debug)]
pub struct ProcessLauncher<'a, 'c, R> {
    runtime: &'a R,
    catalog: &'a ServiceCatalog<'c>,
}

impl<'a, 'c, R: ContainerRuntime> ProcessLauncher<'a, 'c, R> {
    pub fn new(runtime: &'a R, catalog: &'a ServiceCatalog<'c>) -> Self {
        Self { runtime, catalog }
    }

    /// Start the job scheduler.
    pub fn launch_scheduler(&self) -> Result<()> {
        let config_path = self.catalog.runtime_config_container_path();
        let request = self
            .base_request([
                "python3".to_string(),
                "-u".to_string(),
                "-m".to_string(),
                SCHEDULER_MODULE.to_string(),
                "--config".to_string(),
                config_path.display().to_string(),
            ])?;

        self.runtime
            .exec(self.catalog.config().execution_container(), &request)?;
        info!(
            cluster = %self.catalog.config().cluster_name,
            "Started scheduler"
        );
        Ok(())
    }

    /// Start the worker pool with `concurrency` worker processes.
    pub fn launch_workers(&self, concurrency: usize) -> Result<()> {
        let config = self.catalog.config();
        let logs = config.container_view(self.catalog.layout()).logs_directory;
        let request = self
            .base_request([
                "celery".to_string(),
                "-A".to_string(),
                WORKER_APP.to_string(),
                "worker".to_string(),
                "--concurrency".to_string(),
                concurrency.to_string(),
                "--loglevel".to_string(),
                WORKER_LOG_LEVEL.to_string(),
                "-f".to_string(),
                logs.join("worker.log").display().to_string(),
                "-Q".to_string(),
                WORKER_QUEUE.to_string(),
                "-n".to_string(),
                format!("{WORKER_QUEUE}-worker"),
            ])?
            .env(
                "RESULT_BACKEND",
                config.queue.result_backend_url()?.to_string(),
            );

        self.runtime.exec(config.execution_container(), &request)?;
        info!(cluster = %config.cluster_name, concurrency, "Started workers");
        Ok(())
    }

    fn base_request<I>(&self, command: I) -> Result<ExecRequest>
    where
        I: IntoIterator<Item = String>,
    {
        let config = self.catalog.config();
        let layout = self.catalog.layout();
        let view = config.container_view(layout);
        let root = layout.container_root();

        Ok(ExecRequest::new(command)
            .env("CLP_HOME", root.display().to_string())
            .env(
                "PYTHONPATH",
                root.join(PYTHON_PACKAGES_DIR).display().to_string(),
            )
            .env("CLP_DATA_DIR", view.data_directory.display().to_string())
            .env("CLP_LOGS_DIR", view.logs_directory.display().to_string())
            .env("BROKER_URL", config.queue.broker_url()?.to_string())
            .workdir(root)
            .detached())
    }
}
