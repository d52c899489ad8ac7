//! The backend seam: [`ClusterController`] and the launched [`Cluster`]

use deploy_config::ClusterSpec;
use deploy_site::RuntimeProperties;

use crate::Result;
use crate::report::Reporter;

/// One machine of a running cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    pub roles: Vec<String>,
    pub public_ip: String,
    pub private_ip: String,
}

impl Instance {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// A launched cluster: its instances and the client-side configuration
/// needed to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    instances: Vec<Instance>,
    configuration: RuntimeProperties,
}

impl Cluster {
    pub fn new(instances: Vec<Instance>, configuration: RuntimeProperties) -> Self {
        Self {
            instances,
            configuration,
        }
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// First instance running `role`, if any.
    pub fn instance_with_role(&self, role: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.has_role(role))
    }

    /// Runtime properties exposed by the cluster.
    pub fn configuration(&self) -> &RuntimeProperties {
        &self.configuration
    }

    pub fn into_configuration(self) -> RuntimeProperties {
        self.configuration
    }
}

/// An orchestration backend able to create and remove clusters.
///
/// Both calls block until the backend is done. Implementations do not retry
/// and do not clean up after a partial launch.
pub trait ClusterController {
    /// Service name this controller is registered under.
    fn name(&self) -> &str;

    /// Create the machines described by `spec` and return the running cluster.
    fn launch_cluster(&self, spec: &ClusterSpec, reporter: &dyn Reporter) -> Result<Cluster>;

    /// Remove the machines of the cluster described by `spec`.
    fn destroy_cluster(&self, spec: &ClusterSpec, reporter: &dyn Reporter) -> Result<()>;
}
