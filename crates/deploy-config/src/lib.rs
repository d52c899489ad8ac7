//! Configuration loading and cluster spec validation for Cluster Deployer
//!
//! Configuration arrives as flat key/value sources which are layered into a
//! single [`Configuration`] and then validated into a [`ClusterSpec`]:
//!
//! ```text
//!   .properties / .toml / .json / .yaml
//!                  |
//!             ConfigSource            (one per file, flattened to dotted keys)
//!                  |
//!        CompositeConfiguration       (first registered source wins)
//!                  |
//!            Configuration            (merged, ${...} resolved on lookup)
//!                  |
//!       ClusterSpec::validate         (required keys present)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use deploy_config::{ClusterSpec, ConfigLoader};
//!
//! let configuration = ConfigLoader::new(vec!["whirr-hadoop.properties".into()]).load()?;
//! let spec = ClusterSpec::validate(configuration)?;
//! println!("Launching {}", spec.cluster_name());
//! ```

pub mod composite;
pub mod error;
pub mod interpolate;
pub mod loader;
pub mod properties;
pub mod source;
pub mod spec;
pub mod template;

pub use composite::{CompositeConfiguration, Configuration};
pub use error::{Error, Result};
pub use loader::{ConfigLoader, load_file};
pub use source::{ConfigSource, SourceFormat};
pub use spec::{ClusterSpec, Property};
pub use template::InstanceTemplate;
