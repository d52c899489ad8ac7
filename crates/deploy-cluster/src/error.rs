//! Error types for deploy-cluster

use std::path::PathBuf;

/// Result type for deploy-cluster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while launching or destroying a cluster
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend failed to bring the cluster up
    #[error("Failed to launch cluster with service '{service}': {source}")]
    Launch {
        service: String,
        #[source]
        source: Box<Error>,
    },

    /// The backend failed to tear the cluster down
    #[error("Failed to destroy cluster with service '{service}': {source}")]
    Destroy {
        service: String,
        #[source]
        source: Box<Error>,
    },

    /// No backend is registered under the requested name and there is no
    /// default to fall back on
    #[error("No cluster service named '{name}' and no default service registered")]
    UnknownService { name: String },

    /// The orchestration command exited with a non-zero status
    #[error("Command failed (exit code {code}): {stderr}")]
    CommandFailed { code: i32, stderr: String },

    /// The orchestration command could not be started
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid cluster name '{name}': {reason}")]
    InvalidClusterName { name: String, reason: String },

    #[error("Malformed instances file {path} at line {line}: {message}")]
    InstancesFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Backend-specific failure
    #[error("{message}")]
    Backend { message: String },

    #[error(transparent)]
    Config(#[from] deploy_config::Error),

    #[error(transparent)]
    Site(#[from] deploy_site::Error),

    #[error(transparent)]
    Fs(#[from] deploy_fs::Error),
}

impl Error {
    pub(crate) fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
