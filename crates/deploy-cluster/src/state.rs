//! Per-cluster state directory
//!
//! Each cluster keeps its state in `<state-dir>/<cluster-name>/`:
//!
//! ```text
//! ~/.whirr/hadoop/
//!   instances          one line per machine: id, roles, public ip, private ip
//!   hadoop-site.xml    client configuration for the running cluster
//! ```
//!
//! `instances` is tab separated with roles joined by commas.

use std::path::{Path, PathBuf};

use deploy_config::{ClusterSpec, Property};
use deploy_site::RuntimeProperties;

use crate::controller::Instance;
use crate::{Error, Result};

/// Directory name under the home directory used when no state dir is set.
pub const DEFAULT_STATE_DIR: &str = ".whirr";

/// Name of the instances file.
pub const INSTANCES_FILE: &str = "instances";

/// Name of the client configuration file.
pub const SITE_FILE: &str = "hadoop-site.xml";

/// Handle on the state directory of one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterState {
    dir: PathBuf,
}

impl ClusterState {
    /// State for the cluster named `cluster_name` under `root`.
    pub fn new(root: &Path, cluster_name: &str) -> Result<Self> {
        validate_cluster_name(cluster_name)?;
        Ok(Self {
            dir: root.join(cluster_name),
        })
    }

    /// State for the cluster described by `spec`, rooted at
    /// `whirr.state-dir` or `~/.whirr`.
    pub fn for_spec(spec: &ClusterSpec) -> Result<Self> {
        let root = match spec.get(Property::StateDir).filter(|d| !d.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .map(|home| home.join(DEFAULT_STATE_DIR))
                .ok_or_else(|| {
                    Error::backend(format!(
                        "Cannot determine the home directory; set {}",
                        Property::StateDir.config_name()
                    ))
                })?,
        };
        Self::new(&root, &spec.cluster_name())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn instances_path(&self) -> PathBuf {
        self.dir.join(INSTANCES_FILE)
    }

    pub fn site_path(&self) -> PathBuf {
        self.dir.join(SITE_FILE)
    }

    /// Whether a cluster has been recorded here.
    pub fn exists(&self) -> bool {
        self.instances_path().is_file()
    }

    pub fn write_instances(&self, instances: &[Instance]) -> Result<()> {
        let content: String = instances
            .iter()
            .map(|i| {
                format!(
                    "{}\t{}\t{}\t{}\n",
                    i.id,
                    i.roles.join(","),
                    i.public_ip,
                    i.private_ip
                )
            })
            .collect();
        deploy_fs::write_text(&self.instances_path(), &content)?;
        tracing::debug!(path = %self.instances_path().display(), count = instances.len(), "Wrote instances");
        Ok(())
    }

    pub fn read_instances(&self) -> Result<Vec<Instance>> {
        let path = self.instances_path();
        let content = deploy_fs::read_text(&path)?;
        parse_instances(&content, &path)
    }

    pub fn write_site(&self, properties: &RuntimeProperties) -> Result<()> {
        deploy_site::export(properties, &self.site_path())?;
        Ok(())
    }

    pub fn read_site(&self) -> Result<RuntimeProperties> {
        Ok(deploy_site::read(&self.site_path())?)
    }

    /// Delete the state directory. Returns `false` if it did not exist.
    pub fn remove(&self) -> Result<bool> {
        let removed = deploy_fs::remove_dir_if_exists(&self.dir)?;
        tracing::debug!(path = %self.dir.display(), removed, "Removed cluster state");
        Ok(removed)
    }
}

fn validate_cluster_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidClusterName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(invalid("must be a single path component"));
    }
    Ok(())
}

fn parse_instances(content: &str, path: &Path) -> Result<Vec<Instance>> {
    let mut instances = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let [id, roles, public_ip, private_ip] = fields.as_slice() else {
            return Err(Error::InstancesFormat {
                path: path.to_path_buf(),
                line: index + 1,
                message: format!("expected 4 tab separated fields, found {}", fields.len()),
            });
        };

        instances.push(Instance {
            id: id.to_string(),
            roles: roles
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect(),
            public_ip: public_ip.trim().to_string(),
            private_ip: private_ip.trim().to_string(),
        });
    }

    Ok(instances)
}
