//! Run command implementation: the whole launch, export, destroy cycle

use std::path::Path;

use deploy_cluster::HadoopDeployer;

use crate::cli::ConfigArgs;
use crate::commands::load_spec;
use crate::error::Result;
use crate::reporter::ConsoleReporter;

/// Run the run command
pub fn run_cluster(args: &ConfigArgs, output: Option<&Path>) -> Result<()> {
    let spec = load_spec(args)?;
    let reporter = ConsoleReporter;
    HadoopDeployer::new(&reporter).run(&spec, output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::simulated_args;
    use deploy_test_utils::ClusterFixture;

    #[test]
    fn test_run_exports_and_tears_down() {
        let fixture = ClusterFixture::new().with_entry("whirr.service-name", "simulated");
        let (args, _) = simulated_args(&fixture);
        let output = fixture.root().join("hadoop-site.xml");

        run_cluster(&args, Some(&output)).unwrap();

        let properties = deploy_site::read(&output).unwrap();
        assert_eq!(properties["fs.default.name"], "hdfs://192.0.2.1:8020");
        fixture.assert_file_not_exists("state/hadoop");
    }

    #[test]
    fn test_run_stops_at_validation() {
        let fixture = ClusterFixture::new()
            .with_entry("whirr.service-name", "simulated")
            .without_entry("whirr.private-key-file");
        let (args, _) = simulated_args(&fixture);
        let output = fixture.root().join("hadoop-site.xml");

        assert!(run_cluster(&args, Some(&output)).is_err());
        assert!(!output.exists());
        fixture.assert_file_not_exists("state/hadoop");
    }
}
