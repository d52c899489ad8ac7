//! End-to-end deployer flow across crates
//!
//! load -> validate -> launch -> export -> read back -> destroy, using the
//! simulated backend and the fixture files under `test-fixtures/`.

use std::path::{Path, PathBuf};

use deploy_cluster::{ClusterState, Error as ClusterError, HadoopDeployer, Level, MemoryReporter};
use deploy_config::{ClusterSpec, ConfigLoader, Error as ConfigError, Property};
use deploy_test_utils::ClusterFixture;
use pretty_assertions::assert_eq;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures")
        .join(name)
}

/// Layer a state-dir override in front of a fixture file.
fn load_spec(fixture: &ClusterFixture, file: &str) -> ClusterSpec {
    let overrides = fixture.write_file(
        "overrides.properties",
        &format!("whirr.state-dir={}\n", fixture.state_dir().display()),
    );
    let configuration = ConfigLoader::new(vec![overrides, fixture_path(file)])
        .without_user_defaults()
        .load()
        .unwrap();
    ClusterSpec::validate(configuration).unwrap()
}

#[test]
fn test_full_flow_from_properties_fixture() {
    let fixture = ClusterFixture::new();
    let spec = load_spec(&fixture, "hadoop-simulated.properties");
    let reporter = MemoryReporter::new();
    let deployer = HadoopDeployer::new(&reporter);
    let destination = fixture.root().join("export/hadoop-site.xml");

    let cluster = deployer.launch(&spec).unwrap();
    assert_eq!(cluster.instance_count(), 4);

    let path = deployer.export(&cluster, Some(&destination)).unwrap();
    let exported = deploy_site::read(&path).unwrap();
    assert_eq!(&exported, cluster.configuration());
    assert_eq!(exported["fs.default.name"], "hdfs://192.0.2.1:8020");
    assert_eq!(exported["mapred.job.tracker"], "192.0.2.1:8021");

    // The backend's own copy in the state dir matches the export.
    let state = ClusterState::for_spec(&spec).unwrap();
    assert_eq!(state.read_site().unwrap(), exported);

    deployer.destroy(&spec).unwrap();
    assert!(!state.dir().exists());
    assert!(path.exists());

    let messages: Vec<_> = reporter
        .messages()
        .into_iter()
        .map(|(level, message)| {
            assert_eq!(level, Level::Info);
            message
        })
        .collect();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0], "Started hadoop cluster of 4 instances.");
    assert_eq!(messages[2], "Destroying hadoop cluster...");
    assert_eq!(messages[3], "Hadoop cluster destroyed.");
}

#[test]
fn test_toml_fixture_yields_same_cluster() {
    let fixture = ClusterFixture::new();
    let spec = load_spec(&fixture, "hadoop-ec2.toml");
    let reporter = MemoryReporter::new();
    let deployer = HadoopDeployer::new(&reporter);

    let templates = spec.instance_templates().unwrap();
    assert_eq!(templates.len(), 2);

    let cluster = deployer.launch(&spec).unwrap();
    assert_eq!(cluster.instance_count(), 4);
    deployer.destroy(&spec).unwrap();
}

#[test]
fn test_fixture_extras_and_interpolation_survive_validation() {
    let fixture = ClusterFixture::new();
    let spec = load_spec(&fixture, "hadoop-simulated.properties");

    assert_eq!(spec.get(Property::ServiceName).as_deref(), Some("simulated"));
    assert_eq!(
        spec.configuration().get("whirr.hardware-id").as_deref(),
        Some("m1.large")
    );

    let public_key = spec.configuration().get("whirr.public-key-file").unwrap();
    assert!(public_key.ends_with("/.ssh/id_rsa_whirr.pub"));
}

#[test]
fn test_run_flow_with_temp_export() {
    let fixture = ClusterFixture::new();
    let spec = load_spec(&fixture, "hadoop-simulated.properties");
    let reporter = MemoryReporter::new();

    let path = HadoopDeployer::new(&reporter).run(&spec, None).unwrap();

    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("hadoop-site") && file_name.ends_with(".xml"));
    assert!(reporter.infos().contains(&"Configuration file:".to_string()));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_key_stops_before_launch() {
    let fixture = ClusterFixture::new().without_entry("whirr.instance-templates");
    let config = fixture.write_properties("cluster.properties");

    let configuration = ConfigLoader::new(vec![config])
        .without_user_defaults()
        .load()
        .unwrap();
    let err = ClusterSpec::validate(configuration).unwrap_err();

    assert!(matches!(err, ConfigError::MissingConfiguration { .. }));
    assert_eq!(err.missing_options(), &[Property::InstanceTemplates]);
    fixture.assert_file_not_exists("state");
}

#[test]
fn test_launch_failure_leaves_nothing_behind() {
    let fixture = ClusterFixture::new()
        .with_entry("whirr.service-name", "simulated")
        .with_entry("whirr.instance-templates", "3 hadoop-datanode");
    let config = fixture.write_properties("cluster.properties");
    let configuration = ConfigLoader::new(vec![config])
        .without_user_defaults()
        .load()
        .unwrap();
    let spec = ClusterSpec::validate(configuration).unwrap();
    let reporter = MemoryReporter::new();

    let err = HadoopDeployer::new(&reporter).launch(&spec).unwrap_err();

    assert!(matches!(err, ClusterError::Launch { ref service, .. } if service == "simulated"));
    fixture.assert_file_not_exists("state/hadoop");
}
