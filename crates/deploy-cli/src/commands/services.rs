//! Services command implementation

use colored::Colorize;
use deploy_cluster::ControllerFactory;

use crate::error::Result;

/// Run the services command
pub fn run_services() -> Result<()> {
    let factory = ControllerFactory::with_builtins();

    println!("{}", "Available Services".bold());
    println!();
    for name in factory.list() {
        if name == factory.default_service() {
            println!("  {} {} {}", "+".green(), name.cyan(), "(default)".dimmed());
        } else {
            println!("  {} {}", "+".green(), name.cyan());
        }
    }
    println!();
    println!(
        "Select one with {} in the cluster configuration.",
        "whirr.service-name".cyan()
    );
    Ok(())
}
