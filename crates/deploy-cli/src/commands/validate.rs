//! Validate command implementation

use colored::Colorize;
use deploy_config::{ClusterSpec, InstanceTemplate};
use deploy_cluster::DEFAULT_SERVICE;
use serde_json::json;

use crate::cli::ConfigArgs;
use crate::commands::load_spec;
use crate::error::Result;

/// Run the validate command
///
/// Loads and validates the configuration, including the instance templates,
/// and prints it with secrets masked.
pub fn run_validate(args: &ConfigArgs, json: bool) -> Result<()> {
    let spec = load_spec(args)?;
    let templates = spec.instance_templates()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&validate_json(&spec, &templates))?);
        return Ok(());
    }

    println!("{}", "Configuration valid".green().bold());
    println!();
    println!("{}:   {}", "Cluster".dimmed(), spec.cluster_name().cyan());
    println!("{}:  {}", "Provider".dimmed(), spec.provider());
    println!("{}:   {}", "Service".dimmed(), service_label(&spec));
    println!(
        "{}: {}",
        "Instances".dimmed(),
        InstanceTemplate::total_count(&templates)
    );
    println!();

    println!("{}:", "Instance Templates".bold());
    for template in &templates {
        println!("  {} {}", "+".green(), template);
    }
    println!();

    println!("{}:", "Options".bold());
    for (key, value) in spec.redacted() {
        println!("  {} = {}", key.cyan(), value);
    }
    Ok(())
}

fn service_label(spec: &ClusterSpec) -> String {
    spec.service_name()
        .unwrap_or_else(|| format!("{DEFAULT_SERVICE} (default)"))
}

fn validate_json(spec: &ClusterSpec, templates: &[InstanceTemplate]) -> serde_json::Value {
    json!({
        "cluster_name": spec.cluster_name(),
        "service": spec.service_name(),
        "instances": InstanceTemplate::total_count(templates),
        "instance_templates": templates.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "configuration": spec.redacted(),
    })
}
