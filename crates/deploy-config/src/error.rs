//! Error types for deploy-config

use std::path::PathBuf;

use crate::spec::Property;

/// Result type for deploy-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more required options are absent from the merged configuration
    #[error("{}", missing_message(options))]
    MissingConfiguration { options: Vec<Property> },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Invalid instance template '{template}': {reason}")]
    InvalidInstanceTemplate { template: String, reason: String },

    #[error(transparent)]
    Fs(#[from] deploy_fs::Error),
}

impl Error {
    /// The options reported missing, empty for every other variant.
    pub fn missing_options(&self) -> &[Property] {
        match self {
            Self::MissingConfiguration { options } => options,
            _ => &[],
        }
    }
}

fn missing_message(options: &[Property]) -> String {
    let names: Vec<String> = options
        .iter()
        .map(|p| format!("'{}' ({})", p.simple_name(), p.config_name()))
        .collect();

    match names.as_slice() {
        [single] => format!("Option {single} not set."),
        _ => format!("Options {} not set.", names.join(", ")),
    }
}
