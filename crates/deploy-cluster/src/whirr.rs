//! Backend that drives the external `whirr` command line tool
//!
//! The cluster options are written to a temporary properties file and handed to
//! `<command> launch-cluster --config <file>` (or `destroy-cluster`). After a
//! launch the tool leaves `instances` and `hadoop-site.xml` in the cluster
//! state directory, which is where the [`Cluster`] is read back from.
//!
//! The stock whirr CLI always keeps its state under `~/.whirr/<cluster>`.
//! `whirr.state-dir` only has to be set when `whirr.cli-command` names a
//! wrapper that writes its state somewhere else; pointing it anywhere else
//! makes a successful launch fail to find the instance list.
//!
//! The options file holds `whirr.credential` in plain text. It stays owner
//! only (`0600` on unix) while the command runs and is removed afterwards.

use std::path::Path;
use std::process::Command;

use deploy_config::{ClusterSpec, Property, properties};

use crate::controller::{Cluster, ClusterController};
use crate::report::Reporter;
use crate::state::ClusterState;
use crate::{Error, Result};

/// Service name of the whirr backend.
pub const SERVICE_NAME: &str = "whirr";

/// Command used when `whirr.cli-command` is not set.
pub const DEFAULT_COMMAND: &str = "whirr";

/// Backend that shells out to the whirr CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhirrController;

impl WhirrController {
    pub fn new() -> Self {
        Self
    }

    pub fn boxed() -> Box<dyn ClusterController> {
        Box::new(Self::new())
    }

    /// Write the cluster options to a temp properties file, run `action` against it and
    /// remove the file again.
    fn run_action(&self, spec: &ClusterSpec, action: &str) -> Result<()> {
        let config_file = deploy_fs::create_temp_file("whirr-", ".properties")?;

        let entries = spec.configuration().resolved();
        let content = properties::to_string(entries.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let result = deploy_fs::write_text(&config_file, &content)
            .map_err(Error::from)
            .and_then(|()| run_command(&command_line(spec), action, &config_file));

        if let Err(e) = std::fs::remove_file(&config_file) {
            tracing::debug!(path = %config_file.display(), error = %e, "Could not remove temp config file");
        }

        let stdout = result?;
        tracing::debug!(action, stdout = %stdout.trim_end(), "whirr finished");
        Ok(())
    }
}

impl ClusterController for WhirrController {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn launch_cluster(&self, spec: &ClusterSpec, _reporter: &dyn Reporter) -> Result<Cluster> {
        let state = ClusterState::for_spec(spec)?;
        if spec.get(Property::StateDir).is_some() {
            tracing::debug!(
                dir = %state.dir().display(),
                "Reading whirr state from an overridden state directory"
            );
        }
        self.run_action(spec, "launch-cluster")?;

        let instances = state.read_instances()?;
        let configuration = state.read_site()?;
        Ok(Cluster::new(instances, configuration))
    }

    fn destroy_cluster(&self, spec: &ClusterSpec, _reporter: &dyn Reporter) -> Result<()> {
        self.run_action(spec, "destroy-cluster")
    }
}

/// The configured command split into program and leading arguments.
fn command_line(spec: &ClusterSpec) -> Vec<String> {
    let configured = spec
        .get(Property::CliCommand)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COMMAND.to_string());
    configured.split_whitespace().map(String::from).collect()
}

/// Run `<command> <action> --config <config_file>` and return its stdout.
fn run_command(command: &[String], action: &str, config_file: &Path) -> Result<String> {
    let Some((program, leading)) = command.split_first() else {
        return Err(Error::backend("No whirr command configured"));
    };

    tracing::debug!(
        program = %program,
        action,
        config = %config_file.display(),
        "Running whirr"
    );

    let output = Command::new(program)
        .args(leading)
        .arg(action)
        .arg("--config")
        .arg(config_file)
        .output()
        .map_err(|source| Error::Spawn {
            command: command.join(" "),
            source,
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        Err(Error::CommandFailed { code, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_config::Configuration;
    use deploy_test_utils::ClusterFixture;

    fn spec_for(fixture: &ClusterFixture) -> ClusterSpec {
        let configuration: Configuration = fixture
            .entries()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ClusterSpec::validate(configuration).unwrap()
    }

    #[test]
    fn test_command_line_defaults_to_whirr() {
        let spec = spec_for(&ClusterFixture::new());
        assert_eq!(command_line(&spec), vec!["whirr"]);
    }

    #[test]
    fn test_command_line_splits_configured_command() {
        let spec = spec_for(&ClusterFixture::new().with_entry("whirr.cli-command", "sh /opt/whirr/bin/whirr"));
        assert_eq!(command_line(&spec), vec!["sh", "/opt/whirr/bin/whirr"]);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = run_command(
            &["definitely-not-a-real-whirr-binary".to_string()],
            "launch-cluster",
            Path::new("cluster.properties"),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_command_returns_stdout() {
        let command = vec!["sh".to_string(), "-c".to_string(), "echo \"$0 $1 $2\"".to_string()];

        let stdout = run_command(&command, "launch-cluster", Path::new("cluster.properties")).unwrap();

        assert_eq!(stdout, "launch-cluster --config cluster.properties\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_command_failed() {
        let command = vec!["sh".to_string(), "-c".to_string(), "echo boom >&2; exit 3".to_string()];

        let err = run_command(&command, "launch-cluster", Path::new("cluster.properties")).unwrap_err();

        match err {
            Error::CommandFailed { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }
}
