//! Filesystem helpers for Cluster Deployer
//!
//! Provides atomic writes, scoped reads and persisted temp files. Every
//! function releases its file handles before returning, on success and on
//! error.

pub mod error;
pub mod io;

pub use error::{Error, Result};
pub use io::{absolute, create_temp_file, read_text, remove_dir_if_exists, write_atomic, write_text};
