//! One-time database setup run through the execution container.

use std::path::Path;

use tracing::info;

use super::readiness::ReadinessPoller;
use super::services::{ServiceCatalog, PYTHON_PACKAGES_DIR};
use crate::error::Result;
use crate::port::{ContainerRuntime, ExecRequest, Sleeper};

/// Setup scripts, run in this order. Both are idempotent.
pub const SCHEMA_SCRIPTS: [&str; 2] = [
    "initialize-clp-metadata-db.py",
    "initialize-orchestration-db.py",
];

const SCRIPTS_PACKAGE: &str = "clp_py_utils";

/// Runs the setup scripts, each gated by the readiness poller.
#[derive(Debug)]
pub struct SchemaInitializer<'a, R, S> {
    runtime: &'a R,
    poller: &'a ReadinessPoller<S>,
}

impl<'a, R: ContainerRuntime, S: Sleeper> SchemaInitializer<'a, R, S> {
    pub fn new(runtime: &'a R, poller: &'a ReadinessPoller<S>) -> Self {
        Self { runtime, poller }
    }

    /// Run every setup script inside `container`.
    ///
    /// A script failing is taken to mean the database is not accepting
    /// connections yet.
    ///
    /// # Errors
    ///
    /// [`Error::ExhaustedRetries`](crate::error::Error::ExhaustedRetries) if
    /// a script keeps failing.
    pub fn initialize(&self, container: &str, catalog: &ServiceCatalog<'_>) -> Result<()> {
        let config_path = catalog.runtime_config_container_path();
        for script in SCHEMA_SCRIPTS {
            let request = script_request(catalog, script, &config_path);
            self.poller.poll(&format!("schema script {script}"), |_| {
                self.runtime.exec(container, &request)
            })?;
            info!(container, script, "Schema script completed");
        }
        Ok(())
    }
}

fn script_request(catalog: &ServiceCatalog<'_>, script: &str, config_path: &Path) -> ExecRequest {
    let layout = catalog.layout();
    let packages = layout.container_file(PYTHON_PACKAGES_DIR);
    let script_path = packages.join(SCRIPTS_PACKAGE).join(script);

    ExecRequest::new([
        "python3".to_string(),
        script_path.display().to_string(),
        "--config".to_string(),
        config_path.display().to_string(),
    ])
    .env("PYTHONPATH", packages.display().to_string())
    .workdir(layout.container_root())
}
