//! Cluster orchestration for Cluster Deployer
//!
//! A [`HadoopDeployer`] picks a [`ClusterController`] backend by the
//! `whirr.service-name` option and drives it:
//!
//! - `whirr` (default) shells out to the whirr command line tool
//! - `simulated` records a deterministic fake cluster in the state directory
//!
//! # Example
//!
//! ```ignore
//! use deploy_cluster::{HadoopDeployer, TracingReporter};
//!
//! let reporter = TracingReporter;
//! let deployer = HadoopDeployer::new(&reporter);
//! let cluster = deployer.launch(&spec)?;
//! let path = deployer.export(&cluster, None)?;
//! deployer.destroy(&spec)?;
//! ```

pub mod controller;
pub mod deployer;
pub mod error;
pub mod factory;
pub mod report;
pub mod simulated;
pub mod state;
pub mod whirr;

pub use controller::{Cluster, ClusterController, Instance};
pub use deployer::HadoopDeployer;
pub use error::{Error, Result};
pub use factory::{ControllerConstructor, ControllerFactory, DEFAULT_SERVICE};
pub use report::{Level, MemoryReporter, Reporter, TracingReporter};
pub use simulated::SimulatedController;
pub use state::ClusterState;
pub use whirr::WhirrController;
