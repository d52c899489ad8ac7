use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Install the global tracing subscriber.
///
/// Logs go to stderr so stdout stays clean for command output. The level
/// comes from `RUST_LOG`, defaulting to "info"; `verbose` forces "debug".
pub fn init(verbose: bool) -> Result<()> {
    let logging_error = |e: &dyn std::fmt::Display| CliError::Logging {
        message: e.to_string(),
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .compact();

    let filter_layer = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))
    }
    .map_err(|e| logging_error(&e))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| logging_error(&e))?;

    tracing::debug!("Verbose mode enabled");
    Ok(())
}
