//! Progress output for the terminal

use colored::Colorize;
use deploy_cluster::Reporter;

/// Prints progress to stdout and warnings to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("{}: {}", "warning".yellow().bold(), message);
    }
}
