//! Destroy command implementation

use deploy_cluster::HadoopDeployer;

use crate::cli::ConfigArgs;
use crate::commands::load_spec;
use crate::error::Result;
use crate::reporter::ConsoleReporter;

/// Run the destroy command
pub fn run_destroy(args: &ConfigArgs) -> Result<()> {
    let spec = load_spec(args)?;
    let reporter = ConsoleReporter;
    HadoopDeployer::new(&reporter).destroy(&spec)?;
    Ok(())
}
