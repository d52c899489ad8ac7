//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Cluster Deployer - Launch Hadoop clusters and export their configuration
#[derive(Parser, Debug)]
#[command(name = "deployer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the cluster configuration comes from
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Configuration file (.properties, .toml, .json, .yaml); repeat to
    /// layer several, earlier files win
    #[arg(short, long = "config", value_name = "FILE", required = true)]
    pub config: Vec<PathBuf>,

    /// Directory holding defaults.properties, in place of the user config dir
    #[arg(long, value_name = "DIR", env = "CLUSTER_DEPLOYER_DEFAULTS_DIR")]
    pub defaults_dir: Option<PathBuf>,

    /// Do not read the user defaults file
    #[arg(long)]
    pub no_defaults: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Launch a cluster, export its configuration, then destroy it
    ///
    /// Examples:
    ///   deployer run -c hadoop.properties
    ///   deployer run -c hadoop.properties -o hadoop-site.xml
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Where to write the configuration XML (default: a temp file)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Launch a cluster and export its configuration
    Launch {
        #[command(flatten)]
        config: ConfigArgs,

        /// Where to write the configuration XML (default: a temp file)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Destroy a running cluster
    Destroy {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Check that the configuration is complete
    Validate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the available cluster services
    Services,
}
