//! Configuration loading with layered precedence
//!
//! The `ConfigLoader` turns a list of config files into a merged
//! [`Configuration`]. Sources are layered in this order, earlier wins:
//!
//! 1. Files given by the caller, in the order given
//! 2. User defaults - `<config_dir>/cluster-deployer/defaults.properties`
//!
//! Caller files must exist. The user defaults file is optional and silently
//! skipped when absent.

use std::path::{Path, PathBuf};

use crate::composite::{CompositeConfiguration, Configuration};
use crate::source::ConfigSource;
use crate::Result;

/// Name of the per-user defaults file inside the deployer config directory.
pub const DEFAULTS_FILE: &str = "defaults.properties";

/// Loads and layers configuration files.
pub struct ConfigLoader {
    files: Vec<PathBuf>,

    /// Override for the user config directory (used for testing).
    /// When `None`, the platform-appropriate directory is used via `dirs::config_dir()`.
    defaults_dir_override: Option<PathBuf>,

    include_user_defaults: bool,
}

impl ConfigLoader {
    /// Create a loader for the given files, highest precedence first.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            defaults_dir_override: None,
            include_user_defaults: true,
        }
    }

    /// Use a custom directory in place of the platform user config directory.
    pub fn with_defaults_dir(mut self, dir: PathBuf) -> Self {
        self.defaults_dir_override = Some(dir);
        self
    }

    /// Skip the user defaults layer entirely.
    pub fn without_user_defaults(mut self) -> Self {
        self.include_user_defaults = false;
        self
    }

    fn defaults_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.defaults_dir_override {
            return Some(dir.clone());
        }
        dirs::config_dir().map(|d| d.join("cluster-deployer"))
    }

    /// Path of the user defaults file, whether or not it exists.
    pub fn defaults_path(&self) -> Option<PathBuf> {
        self.defaults_dir().map(|d| d.join(DEFAULTS_FILE))
    }

    /// Build the composite of all layers without merging it.
    pub fn composite(&self) -> Result<CompositeConfiguration> {
        let mut composite = CompositeConfiguration::new();

        for file in &self.files {
            tracing::debug!(path = %file.display(), "Loading config file");
            composite.add_source(ConfigSource::load(file)?);
        }

        if self.include_user_defaults {
            match self.defaults_path() {
                Some(path) if path.is_file() => {
                    tracing::debug!(path = %path.display(), "Loading user defaults");
                    composite.add_source(ConfigSource::load(&path)?);
                }
                Some(path) => {
                    tracing::debug!(path = %path.display(), "No user defaults found, skipping");
                }
                None => {}
            }
        }

        Ok(composite)
    }

    /// Load every layer and merge into a single configuration.
    pub fn load(&self) -> Result<Configuration> {
        Ok(self.composite()?.merge())
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Load a single config file with no other layers.
pub fn load_file(path: &Path) -> Result<Configuration> {
    ConfigLoader::new(vec![path.to_path_buf()])
        .without_user_defaults()
        .load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_single_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("whirr.properties");
        fs::write(&path, "whirr.cluster-name=hadoop\n").unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.get("whirr.cluster-name").as_deref(), Some("hadoop"));
    }

    #[test]
    fn test_earlier_files_override_later_files() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("override.properties");
        let second = temp.path().join("base.toml");
        fs::write(&first, "whirr.provider=aws-ec2\n").unwrap();
        fs::write(&second, "[whirr]\nprovider = \"cloudservers\"\ncluster-name = \"base\"\n").unwrap();

        let config = ConfigLoader::new(vec![first, second])
            .without_user_defaults()
            .load()
            .unwrap();

        assert_eq!(config.get("whirr.provider").as_deref(), Some("aws-ec2"));
        assert_eq!(config.get("whirr.cluster-name").as_deref(), Some("base"));
    }

    #[test]
    fn test_user_defaults_have_lowest_precedence() {
        let temp = TempDir::new().unwrap();
        let defaults_dir = temp.path().join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(
            defaults_dir.join(DEFAULTS_FILE),
            "whirr.provider=cloudservers\nwhirr.location-id=us-east-1\n",
        )
        .unwrap();
        let file = temp.path().join("cluster.properties");
        fs::write(&file, "whirr.provider=aws-ec2\n").unwrap();

        let loader = ConfigLoader::new(vec![file]).with_defaults_dir(defaults_dir);
        let composite = loader.composite().unwrap();
        assert_eq!(composite.sources().len(), 2);

        let config = composite.merge();
        assert_eq!(config.get("whirr.provider").as_deref(), Some("aws-ec2"));
        assert_eq!(config.get("whirr.location-id").as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_missing_user_defaults_are_skipped() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("cluster.properties");
        fs::write(&file, "a=b\n").unwrap();

        let loader =
            ConfigLoader::new(vec![file]).with_defaults_dir(temp.path().join("nowhere"));

        assert_eq!(loader.composite().unwrap().sources().len(), 1);
    }

    #[test]
    fn test_missing_caller_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::new(vec![temp.path().join("absent.properties")])
            .without_user_defaults();

        assert!(loader.load().is_err());
    }
}
