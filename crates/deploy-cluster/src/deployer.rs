//! The Hadoop deployer facade
//!
//! Ties a validated [`ClusterSpec`] to a backend picked by the
//! [`ControllerFactory`] and reports progress through a [`Reporter`].

use std::path::{Path, PathBuf};

use deploy_config::ClusterSpec;

use crate::controller::Cluster;
use crate::factory::ControllerFactory;
use crate::report::Reporter;
use crate::{Error, Result};

/// Prefix and suffix of the exported file when no destination is given.
pub const SITE_TEMP_PREFIX: &str = "hadoop-site";
pub const SITE_TEMP_SUFFIX: &str = ".xml";

/// Drives one backend through launch, export and destroy.
pub struct HadoopDeployer<'r> {
    factory: ControllerFactory,
    reporter: &'r dyn Reporter,
}

impl<'r> HadoopDeployer<'r> {
    /// A deployer over the built-in backends.
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self::with_factory(ControllerFactory::with_builtins(), reporter)
    }

    pub fn with_factory(factory: ControllerFactory, reporter: &'r dyn Reporter) -> Self {
        Self { factory, reporter }
    }

    pub fn factory(&self) -> &ControllerFactory {
        &self.factory
    }

    /// Start the cluster described by `spec`.
    pub fn launch(&self, spec: &ClusterSpec) -> Result<Cluster> {
        let controller = self
            .factory
            .create(spec.service_name().as_deref(), self.reporter)?;

        let cluster = controller
            .launch_cluster(spec, self.reporter)
            .map_err(|e| Error::Launch {
                service: controller.name().to_string(),
                source: Box::new(e),
            })?;

        self.reporter.info(&format!(
            "Started hadoop cluster of {} instances.",
            cluster.instance_count()
        ));
        Ok(cluster)
    }

    /// Tear down the cluster described by `spec`.
    pub fn destroy(&self, spec: &ClusterSpec) -> Result<()> {
        let controller = self
            .factory
            .create(spec.service_name().as_deref(), self.reporter)?;

        self.reporter.info("Destroying hadoop cluster...");
        controller
            .destroy_cluster(spec, self.reporter)
            .map_err(|e| Error::Destroy {
                service: controller.name().to_string(),
                source: Box::new(e),
            })?;
        self.reporter.info("Hadoop cluster destroyed.");
        Ok(())
    }

    /// Write the cluster configuration to `destination`, or to a fresh
    /// `hadoop-site*.xml` temp file, and return the absolute path written.
    pub fn export(&self, cluster: &Cluster, destination: Option<&Path>) -> Result<PathBuf> {
        let path = match destination {
            Some(path) => path.to_path_buf(),
            None => deploy_fs::create_temp_file(SITE_TEMP_PREFIX, SITE_TEMP_SUFFIX)
                .map_err(temp_destination_error)?,
        };

        deploy_site::export(cluster.configuration(), &path)?;

        let path = deploy_fs::absolute(&path);
        self.reporter.info(&format!(
            "Hadoop configuration XML can be found at {}.",
            path.display()
        ));
        Ok(path)
    }

    /// The full demo flow: launch, export and show the configuration, then
    /// destroy. Returns the path of the exported file.
    ///
    /// Nothing is cleaned up if a step fails.
    pub fn run(&self, spec: &ClusterSpec, destination: Option<&Path>) -> Result<PathBuf> {
        let cluster = self.launch(spec)?;
        let path = self.export(&cluster, destination)?;

        let contents = deploy_fs::read_text(&path)?;
        self.reporter.info("Configuration file:");
        self.reporter.info(contents.trim_end());

        self.destroy(spec)?;
        Ok(path)
    }
}

/// A missing export destination is a serialization failure like any other
/// write failure of the document.
fn temp_destination_error(e: deploy_fs::Error) -> Error {
    let path = std::env::temp_dir().join(format!("{SITE_TEMP_PREFIX}*{SITE_TEMP_SUFFIX}"));
    deploy_site::Error::Serialization {
        path,
        message: e.to_string(),
    }
    .into()
}
