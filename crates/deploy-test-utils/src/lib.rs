//! Shared test utilities for the cluster-deployer workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixture`] - [`ClusterFixture`] builder for config files and state dirs

pub mod fixture;

pub use fixture::{ClusterFixture, REQUIRED_ENTRIES, sample_runtime_properties};
