//! In-process backend that pretends to provision machines
//!
//! Instances are numbered from 1 in template order and get deterministic
//! addresses, so the same spec always yields the same cluster:
//!
//! | n | id                   | private    | public      |
//! |---|----------------------|------------|-------------|
//! | 1 | `sim-<cluster>-1`    | `10.0.0.1` | `192.0.2.1` |
//! | 2 | `sim-<cluster>-2`    | `10.0.0.2` | `192.0.2.2` |

use deploy_config::{ClusterSpec, InstanceTemplate};
use deploy_site::RuntimeProperties;

use crate::controller::{Cluster, ClusterController, Instance};
use crate::report::Reporter;
use crate::state::ClusterState;
use crate::{Error, Result};

/// Service name of the simulated backend.
pub const SERVICE_NAME: &str = "simulated";

pub const NAMENODE_ROLE: &str = "hadoop-namenode";
pub const JOBTRACKER_ROLE: &str = "hadoop-jobtracker";

pub const NAMENODE_PORT: u16 = 8020;
pub const JOBTRACKER_PORT: u16 = 8021;

/// Largest cluster that fits in the simulated address ranges.
pub const MAX_INSTANCES: usize = 254;

/// Backend that records clusters in the state directory without touching
/// any cloud provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedController;

impl SimulatedController {
    pub fn new() -> Self {
        Self
    }

    pub fn boxed() -> Box<dyn ClusterController> {
        Box::new(Self::new())
    }
}

impl ClusterController for SimulatedController {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn launch_cluster(&self, spec: &ClusterSpec, _reporter: &dyn Reporter) -> Result<Cluster> {
        let templates = spec.instance_templates()?;
        if !templates.iter().any(|t| t.has_role(NAMENODE_ROLE)) {
            return Err(Error::backend(format!(
                "No instance template runs the {NAMENODE_ROLE} role"
            )));
        }

        let total = InstanceTemplate::total_count(&templates);
        if total > MAX_INSTANCES {
            return Err(Error::backend(format!(
                "Simulated clusters are limited to {MAX_INSTANCES} instances, {total} requested"
            )));
        }

        let cluster_name = spec.cluster_name();
        let state = ClusterState::for_spec(spec)?;
        if state.exists() {
            return Err(Error::backend(format!(
                "Cluster {cluster_name} is already running (state in {})",
                state.dir().display()
            )));
        }

        let instances = expand(&cluster_name, &templates);
        let configuration = runtime_properties(&instances);

        state.write_instances(&instances)?;
        state.write_site(&configuration)?;

        tracing::debug!(
            cluster = %cluster_name,
            instances = instances.len(),
            state = %state.dir().display(),
            "Simulated cluster launched"
        );
        Ok(Cluster::new(instances, configuration))
    }

    fn destroy_cluster(&self, spec: &ClusterSpec, reporter: &dyn Reporter) -> Result<()> {
        let state = ClusterState::for_spec(spec)?;
        if !state.remove()? {
            reporter.warn(&format!(
                "Cluster {} is not running, nothing to destroy.",
                spec.cluster_name()
            ));
        }
        Ok(())
    }
}

fn expand(cluster_name: &str, templates: &[InstanceTemplate]) -> Vec<Instance> {
    templates
        .iter()
        .flat_map(|t| std::iter::repeat_n(&t.roles, t.count))
        .enumerate()
        .map(|(index, roles)| {
            let n = index + 1;
            Instance {
                id: format!("sim-{cluster_name}-{n}"),
                roles: roles.clone(),
                public_ip: format!("192.0.2.{n}"),
                private_ip: format!("10.0.0.{n}"),
            }
        })
        .collect()
}

/// Client configuration for a Hadoop cluster reached through a SOCKS proxy.
fn runtime_properties(instances: &[Instance]) -> RuntimeProperties {
    let mut properties = RuntimeProperties::new();

    let with_role = |role: &str| instances.iter().find(|i| i.has_role(role));

    if let Some(namenode) = with_role(NAMENODE_ROLE) {
        properties.insert(
            "fs.default.name".into(),
            format!("hdfs://{}:{NAMENODE_PORT}", namenode.public_ip),
        );
    }
    if let Some(jobtracker) = with_role(JOBTRACKER_ROLE) {
        properties.insert(
            "mapred.job.tracker".into(),
            format!("{}:{JOBTRACKER_PORT}", jobtracker.public_ip),
        );
    }
    properties.insert("hadoop.job.ugi".into(), "root,root".into());
    properties.insert(
        "hadoop.rpc.socket.factory.class.default".into(),
        "org.apache.hadoop.net.SocksSocketFactory".into(),
    );
    properties.insert("hadoop.socks.server".into(), "localhost:6666".into());

    properties
}
