use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[source] toml::ser::Error),

    #[error("cluster '{cluster}' has not been initialized; run `clpctl start` first")]
    NotInitialized { cluster: String },

    #[error("{0}")]
    Other(String),
}

/// A subprocess that exited unsuccessfully or could not be spawned.
#[derive(Error, Debug)]
pub enum SubprocessError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// An invalid start sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("step {step} requires {missing}, which is not scheduled before it")]
    UnmetRequirement {
        step: &'static str,
        missing: &'static str,
    },

    #[error("step {0} is scheduled more than once")]
    Duplicate(&'static str),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Subprocess(#[from] SubprocessError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("cluster '{cluster}' is already provisioned ({resource} exists); run `clpctl stop` first")]
    AlreadyProvisioned { cluster: String, resource: String },

    #[error("cluster '{cluster}' is not provisioned")]
    NotProvisioned { cluster: String },

    #[error("cluster '{cluster}' was only partially torn down ({failures} failed operations)")]
    TeardownIncomplete { cluster: String, failures: usize },

    #[error("{operation} did not become ready after {attempts} attempts: {last_error}")]
    ExhaustedRetries {
        operation: String,
        attempts: u32,
        last_error: String,
    },

    #[error("cluster '{cluster}': {source}")]
    Cluster {
        cluster: String,
        #[source]
        source: Box<Error>,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach the cluster name to errors that do not already carry it.
    #[must_use]
    pub fn in_cluster(self, cluster: &str) -> Self {
        match self {
            Error::AlreadyProvisioned { .. }
            | Error::NotProvisioned { .. }
            | Error::TeardownIncomplete { .. }
            | Error::Cluster { .. }
            | Error::Config(ConfigError::NotInitialized { .. }) => self,
            other => Error::Cluster {
                cluster: cluster.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through cluster annotations.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::Cluster { source, .. } => source.root(),
            other => other,
        }
    }
}
