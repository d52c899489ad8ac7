//! Cluster specification and required-key validation

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::composite::Configuration;
use crate::template::InstanceTemplate;
use crate::{Error, Result};

/// Text shown in place of secret values.
pub const REDACTED: &str = "********";

/// Configuration options understood by the deployer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    ClusterName,
    ServiceName,
    Provider,
    Identity,
    Credential,
    InstanceTemplates,
    PrivateKeyFile,
    StateDir,
    CliCommand,
}

impl Property {
    /// Options that must be present before a cluster can be launched.
    pub const REQUIRED: [Property; 6] = [
        Property::ClusterName,
        Property::Provider,
        Property::Identity,
        Property::Credential,
        Property::InstanceTemplates,
        Property::PrivateKeyFile,
    ];

    /// Key used in configuration files.
    pub fn config_name(self) -> &'static str {
        match self {
            Self::ClusterName => "whirr.cluster-name",
            Self::ServiceName => "whirr.service-name",
            Self::Provider => "whirr.provider",
            Self::Identity => "whirr.identity",
            Self::Credential => "whirr.credential",
            Self::InstanceTemplates => "whirr.instance-templates",
            Self::PrivateKeyFile => "whirr.private-key-file",
            Self::StateDir => "whirr.state-dir",
            Self::CliCommand => "whirr.cli-command",
        }
    }

    /// Short camel-case name used in messages.
    pub fn simple_name(self) -> &'static str {
        match self {
            Self::ClusterName => "clusterName",
            Self::ServiceName => "serviceName",
            Self::Provider => "provider",
            Self::Identity => "identity",
            Self::Credential => "credential",
            Self::InstanceTemplates => "instanceTemplates",
            Self::PrivateKeyFile => "privateKeyFile",
            Self::StateDir => "stateDir",
            Self::CliCommand => "cliCommand",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

/// A validated cluster description.
///
/// Wraps the whole merged configuration, extra keys included. Every
/// [`Property::REQUIRED`] key is guaranteed present. Never mutated after
/// validation; the same spec is used to launch and to destroy.
#[derive(Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    configuration: Configuration,
}

impl ClusterSpec {
    /// Check that every required option is present.
    ///
    /// All missing options are reported together, in [`Property::REQUIRED`]
    /// order. An option set to an empty string counts as present.
    pub fn validate(configuration: Configuration) -> Result<Self> {
        let missing: Vec<Property> = Property::REQUIRED
            .into_iter()
            .filter(|p| !configuration.contains_key(p.config_name()))
            .collect();

        if !missing.is_empty() {
            return Err(Error::MissingConfiguration { options: missing });
        }

        Ok(Self { configuration })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn into_configuration(self) -> Configuration {
        self.configuration
    }

    /// Interpolated value of an option.
    pub fn get(&self, property: Property) -> Option<String> {
        self.configuration.get(property.config_name())
    }

    fn required(&self, property: Property) -> String {
        self.get(property).unwrap_or_default()
    }

    pub fn cluster_name(&self) -> String {
        self.required(Property::ClusterName)
    }

    pub fn provider(&self) -> String {
        self.required(Property::Provider)
    }

    pub fn identity(&self) -> String {
        self.required(Property::Identity)
    }

    pub fn credential(&self) -> String {
        self.required(Property::Credential)
    }

    pub fn private_key_file(&self) -> PathBuf {
        PathBuf::from(self.required(Property::PrivateKeyFile))
    }

    /// Backend service name, `None` when not configured.
    pub fn service_name(&self) -> Option<String> {
        self.get(Property::ServiceName)
            .filter(|name| !name.trim().is_empty())
    }

    /// Parse the instance templates option.
    pub fn instance_templates(&self) -> Result<Vec<InstanceTemplate>> {
        InstanceTemplate::parse_list(&self.required(Property::InstanceTemplates))
    }

    /// Resolved entries with secret values replaced by [`REDACTED`].
    pub fn redacted(&self) -> BTreeMap<String, String> {
        let mut entries = self.configuration.resolved();
        if let Some(value) = entries.get_mut(Property::Credential.config_name()) {
            *value = REDACTED.to_string();
        }
        entries
    }
}

impl fmt::Debug for ClusterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterSpec")
            .field("cluster_name", &self.cluster_name())
            .field("provider", &self.provider())
            .field("service_name", &self.service_name())
            .field("keys", &self.configuration.len())
            .finish_non_exhaustive()
    }
}
