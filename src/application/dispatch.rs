//! Command dispatch into a running cluster's execution container.
//!
//! Each dispatch writes its database connection file (and path list, when
//! one is needed) to the logs directory, which the execution container can
//! always see, and removes them again when the dispatch returns.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::ephemeral::EphemeralFile;
use super::network;
use super::services::ServiceCatalog;
use crate::domain::layout::{rebase, InstallLayout, CONTAINER_INPUT_LOGS_DIR};
use crate::domain::runtime::{DatabaseConnectionParams, RuntimeConfig};
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::host;
use crate::port::{ContainerRuntime, ExecOutput, ExecRequest};

const COMPRESS_BINARY: &str = "bin/clp";
const SEARCH_BINARY: &str = "bin/clg";

/// Runs the compression tools inside the execution container.
#[derive(Debug)]
pub struct Dispatcher<'a, R> {
    runtime: &'a R,
    catalog: ServiceCatalog<'a>,
}

impl<'a, R: ContainerRuntime> Dispatcher<'a, R> {
    pub fn new(runtime: &'a R, config: &'a RuntimeConfig, layout: &'a InstallLayout) -> Self {
        Self {
            runtime,
            catalog: ServiceCatalog::new(config, layout),
        }
    }

    fn config(&self) -> &'a RuntimeConfig {
        self.catalog.config()
    }

    fn layout(&self) -> &'a InstallLayout {
        self.catalog.layout()
    }

    /// Compress `paths`, all of which must lie under the input directory.
    /// Relative paths are taken from the current directory.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingField`] if `paths` is empty
    /// - [`ConfigError::InvalidValue`] if a path is outside the input
    ///   directory
    /// - [`Error::NotProvisioned`] if the execution container is not running
    pub fn compress(&self, paths: &[PathBuf]) -> Result<ExecOutput> {
        if paths.is_empty() {
            return Err(ConfigError::MissingField { field: "paths" }.into());
        }
        let input = &self.config().input_logs_directory;
        let container_paths = paths
            .iter()
            .map(|path| {
                self.input_path(&host::absolute(path)?).ok_or_else(|| {
                    Error::from(ConfigError::InvalidValue {
                        field: "paths",
                        reason: format!(
                            "{} is outside the input logs directory {}",
                            path.display(),
                            input.display()
                        ),
                    })
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.ensure_running()?;

        let archive = &self.config().archive_output;
        let path_list = self.path_list(&container_paths)?;
        let db_config = self.db_config_file()?;
        let request = ExecRequest::new([
            self.binary(COMPRESS_BINARY),
            "c".to_string(),
            "--db-config-file".to_string(),
            self.visible(db_config.path())?,
            "--files-from".to_string(),
            self.visible(path_list.path())?,
            "--target-encoded-file-size".to_string(),
            archive.target_encoded_file_size.to_string(),
            "--target-segment-size".to_string(),
            archive.target_segment_size.to_string(),
            "--target-dictionaries-size".to_string(),
            archive.target_dictionaries_size.to_string(),
            self.archives_dir(),
        ]);

        info!(cluster = %self.config().cluster_name, files = paths.len(), "Compressing");
        self.run(request)
    }

    /// Decompress into `extraction_dir`, optionally only `paths`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if `extraction_dir` is not writable from
    /// inside the execution container.
    pub fn decompress(&self, paths: &[PathBuf], extraction_dir: &Path) -> Result<ExecOutput> {
        let extraction = self.writable_path(extraction_dir)?;
        self.ensure_running()?;
        fs::create_dir_all(extraction_dir)?;

        let db_config = self.db_config_file()?;
        let mut command = vec![
            self.binary(COMPRESS_BINARY),
            "x".to_string(),
            "--db-config-file".to_string(),
            self.visible(db_config.path())?,
        ];

        let filter = paths
            .iter()
            .map(|p| self.archived_path(p))
            .collect::<Result<Vec<_>>>()?;
        let path_list = if filter.is_empty() {
            None
        } else {
            Some(self.path_list(&filter)?)
        };
        if let Some(list) = &path_list {
            command.push("-f".to_string());
            command.push(self.visible(list.path())?);
        }
        command.push(self.archives_dir());
        command.push(extraction.display().to_string());

        info!(
            cluster = %self.config().cluster_name,
            extraction_dir = %extraction_dir.display(),
            "Decompressing"
        );
        self.run(ExecRequest::new(command))
    }

    /// Search the archives for `query`, optionally restricted to one file.
    pub fn search(&self, query: &str, file_path: Option<&Path>) -> Result<ExecOutput> {
        if query.is_empty() {
            return Err(ConfigError::MissingField { field: "query" }.into());
        }
        self.ensure_running()?;

        let db_config = self.db_config_file()?;
        let mut command = vec![
            self.binary(SEARCH_BINARY),
            "--db-config-file".to_string(),
            self.visible(db_config.path())?,
            self.archives_dir(),
            query.to_string(),
        ];
        if let Some(path) = file_path {
            command.push(self.archived_path(path)?.display().to_string());
        }

        info!(cluster = %self.config().cluster_name, query, "Searching");
        self.run(ExecRequest::new(command))
    }

    /// The execution container must be attached to the cluster network.
    fn ensure_running(&self) -> Result<()> {
        let config = self.config();
        let running = network::membership(self.runtime, &config.cluster_name)?
            .is_some_and(|m| m.contains_name(config.execution_container()));
        if running {
            Ok(())
        } else {
            Err(Error::NotProvisioned {
                cluster: config.cluster_name.clone(),
            })
        }
    }

    fn run(&self, request: ExecRequest) -> Result<ExecOutput> {
        let request = request.workdir(self.layout().container_root());
        self.runtime
            .exec(self.config().execution_container(), &request)
    }

    fn binary(&self, relative: &str) -> String {
        self.layout().container_file(relative).display().to_string()
    }

    fn archives_dir(&self) -> String {
        self.config()
            .container_view(self.layout())
            .archive_output
            .directory
            .display()
            .to_string()
    }

    fn input_path(&self, host_path: &Path) -> Option<PathBuf> {
        rebase(
            host_path,
            &self.config().input_logs_directory,
            Path::new(CONTAINER_INPUT_LOGS_DIR),
        )
    }

    /// Paths are archived under their input-mount location; map host paths
    /// there and pass anything else through unchanged.
    fn archived_path(&self, path: &Path) -> Result<PathBuf> {
        Ok(self
            .input_path(&host::absolute(path)?)
            .unwrap_or_else(|| path.to_path_buf()))
    }

    fn writable_path(&self, host_dir: &Path) -> Result<PathBuf> {
        let absolute = host::absolute(host_dir)?;
        match self.config().to_container_path(self.layout(), &absolute) {
            Some(path) if !path.starts_with(CONTAINER_INPUT_LOGS_DIR) => Ok(path),
            _ => Err(ConfigError::InvalidValue {
                field: "extraction_dir",
                reason: format!(
                    "{} is not writable from the execution container; use a directory under {}",
                    host_dir.display(),
                    self.layout().host_root().display()
                ),
            }
            .into()),
        }
    }

    fn visible(&self, host_path: &Path) -> Result<String> {
        self.config()
            .to_container_path(self.layout(), host_path)
            .map(|p| p.display().to_string())
            .ok_or_else(|| {
                ConfigError::Other(format!(
                    "{} is not visible in the execution container",
                    host_path.display()
                ))
                .into()
            })
    }

    fn logs_dir(&self) -> &'a Path {
        &self.config().logs_directory
    }

    fn path_list(&self, paths: &[PathBuf]) -> Result<EphemeralFile> {
        let mut contents = String::new();
        for path in paths {
            contents.push_str(&path.display().to_string());
            contents.push('\n');
        }
        EphemeralFile::create(self.logs_dir(), "paths.txt", &contents)
    }

    fn db_config_file(&self) -> Result<EphemeralFile> {
        let params = DatabaseConnectionParams::from(&self.config().database);
        let rendered = toml::to_string(&params).map_err(ConfigError::Render)?;
        EphemeralFile::create(self.logs_dir(), "db-config.toml", &rendered)
    }
}
