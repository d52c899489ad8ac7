//! Error types for deploy-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] deploy_config::Error),

    #[error(transparent)]
    Cluster(#[from] deploy_cluster::Error),

    #[error(transparent)]
    Site(#[from] deploy_site::Error),

    #[error(transparent)]
    Fs(#[from] deploy_fs::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The tracing subscriber could not be installed
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },
}
