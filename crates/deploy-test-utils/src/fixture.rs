//! [`ClusterFixture`] builder for deployer test scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A complete set of required options for a small Hadoop cluster.
pub const REQUIRED_ENTRIES: [(&str, &str); 6] = [
    ("whirr.cluster-name", "hadoop"),
    ("whirr.provider", "aws-ec2"),
    ("whirr.identity", "AKIAEXAMPLE"),
    ("whirr.credential", "s3cr3t"),
    (
        "whirr.instance-templates",
        "1 hadoop-namenode+hadoop-jobtracker,3 hadoop-datanode+hadoop-tasktracker",
    ),
    ("whirr.private-key-file", "/home/hadoop/.ssh/id_rsa_whirr"),
];

/// Runtime properties shaped like those a running Hadoop cluster exposes.
pub fn sample_runtime_properties() -> BTreeMap<String, String> {
    [
        ("fs.default.name", "hdfs://10.0.0.1:8020"),
        ("mapred.job.tracker", "10.0.0.1:8021"),
        ("hadoop.job.ugi", "root,root"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// A temporary directory holding a cluster config file and a state dir.
///
/// # Example
///
/// ```rust,no_run
/// use deploy_test_utils::ClusterFixture;
///
/// let fixture = ClusterFixture::new()
///     .with_entry("whirr.service-name", "simulated")
///     .without_entry("whirr.credential");
/// let path = fixture.write_properties("cluster.properties");
/// fixture.assert_file_exists("cluster.properties");
/// ```
pub struct ClusterFixture {
    temp_dir: TempDir,
    entries: BTreeMap<String, String>,
}

impl Default for ClusterFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterFixture {
    /// Create a fixture with every required option set. The state dir points
    /// inside the temporary directory so tests never touch `~/.whirr`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let state_dir = temp_dir.path().join("state");
        let mut entries: BTreeMap<String, String> = REQUIRED_ENTRIES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        entries.insert(
            "whirr.state-dir".to_string(),
            state_dir.to_string_lossy().to_string(),
        );
        Self { temp_dir, entries }
    }

    /// Set or replace an option.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Remove an option.
    pub fn without_entry(mut self, key: &str) -> Self {
        self.entries.remove(key);
        self
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The state dir configured through `whirr.state-dir`.
    pub fn state_dir(&self) -> PathBuf {
        self.root().join("state")
    }

    /// The options this fixture writes.
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Write the options as `key=value` lines to `name` under the root.
    ///
    /// Values are written verbatim, so tests must not use characters that
    /// need properties escaping.
    pub fn write_properties(&self, name: &str) -> PathBuf {
        let content: String = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect();
        self.write_file(name, &content)
    }

    /// Write arbitrary content to `name` under the root.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
