//! Error types for deploy-site

use std::path::PathBuf;

/// Result type for deploy-site operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing or reading configuration documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document could not be rendered or written to its destination
    #[error("Failed to write configuration to {path}: {message}")]
    Serialization { path: PathBuf, message: String },

    /// Rendering failed before any destination was involved
    #[error("Failed to render configuration document: {message}")]
    Render { message: String },

    #[error("Failed to parse configuration document {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error(transparent)]
    Fs(#[from] deploy_fs::Error),
}
