//! Command implementations for deploy-cli

pub mod destroy;
pub mod launch;
pub mod run;
pub mod services;
pub mod validate;

pub use destroy::run_destroy;
pub use launch::run_launch;
pub use run::run_cluster;
pub use services::run_services;
pub use validate::run_validate;

use deploy_config::{ClusterSpec, ConfigLoader};

use crate::cli::ConfigArgs;
use crate::error::Result;

/// Load the layered configuration named by `args` and validate it.
pub fn load_spec(args: &ConfigArgs) -> Result<ClusterSpec> {
    let mut loader = ConfigLoader::new(args.config.clone());
    if let Some(dir) = &args.defaults_dir {
        loader = loader.with_defaults_dir(dir.clone());
    }
    if args.no_defaults {
        loader = loader.without_user_defaults();
    }

    let configuration = loader.load()?;
    tracing::debug!(keys = configuration.len(), "Configuration loaded");
    Ok(ClusterSpec::validate(configuration)?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use deploy_test_utils::ClusterFixture;

    use crate::cli::ConfigArgs;

    /// Config args for a fixture, with the simulated backend and no user
    /// defaults.
    pub fn simulated_args(fixture: &ClusterFixture) -> (ConfigArgs, PathBuf) {
        let path = fixture.write_properties("cluster.properties");
        let args = ConfigArgs {
            config: vec![path.clone()],
            defaults_dir: None,
            no_defaults: true,
        };
        (args, path)
    }
}
