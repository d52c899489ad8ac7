//! Launch command implementation

use std::path::Path;

use deploy_cluster::{Cluster, HadoopDeployer, Reporter, TracingReporter};
use serde_json::json;

use crate::cli::ConfigArgs;
use crate::commands::load_spec;
use crate::error::Result;
use crate::reporter::ConsoleReporter;

/// Run the launch command
///
/// In JSON mode progress goes to the log instead of stdout, which carries
/// only the JSON document.
pub fn run_launch(args: &ConfigArgs, output: Option<&Path>, json: bool) -> Result<()> {
    let spec = load_spec(args)?;

    let reporter: &dyn Reporter = if json { &TracingReporter } else { &ConsoleReporter };
    let deployer = HadoopDeployer::new(reporter);

    let cluster = deployer.launch(&spec)?;
    let path = deployer.export(&cluster, output)?;

    if json {
        let document = launch_json(&spec.cluster_name(), &cluster, &path);
        println!("{}", serde_json::to_string_pretty(&document)?);
    }
    Ok(())
}

fn launch_json(cluster_name: &str, cluster: &Cluster, path: &Path) -> serde_json::Value {
    let instances: Vec<_> = cluster
        .instances()
        .iter()
        .map(|i| {
            json!({
                "id": i.id,
                "roles": i.roles,
                "public_ip": i.public_ip,
                "private_ip": i.private_ip,
            })
        })
        .collect();

    json!({
        "cluster_name": cluster_name,
        "instances": instances,
        "configuration": cluster.configuration(),
        "path": path.display().to_string(),
    })
}
