//! Cluster Deployer CLI
//!
//! Launches a Hadoop cluster through an orchestration backend, exports the
//! cluster's client configuration as XML and tears the cluster down.

mod cli;
mod commands;
mod error;
mod logging;
mod reporter;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Run { config, output } => commands::run_cluster(&config, output.as_deref()),
        Commands::Launch {
            config,
            output,
            json,
        } => commands::run_launch(&config, output.as_deref(), json),
        Commands::Destroy { config } => commands::run_destroy(&config),
        Commands::Validate { config, json } => commands::run_validate(&config, json),
        Commands::Services => commands::run_services(),
    }
}
