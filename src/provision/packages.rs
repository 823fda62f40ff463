//! OS package installation via apt.

use crate::error::InstallError;
use crate::system::{CommandRunner, CommandSpec};

fn apt(args: &[&str]) -> CommandSpec {
    CommandSpec::new("apt-get")
        .env("DEBIAN_FRONTEND", "noninteractive")
        .args(args.iter().copied())
}

/// Commands issued for `packages`, in order. Empty when there is nothing
/// to install.
pub fn plan(packages: &[String]) -> Vec<CommandSpec> {
    if packages.is_empty() {
        return Vec::new();
    }
    vec![
        apt(&["update"]),
        apt(&["install", "-y"]).args(packages.iter().cloned()),
    ]
}

/// Refresh the package index and install `packages`.
pub async fn install<R: CommandRunner>(runner: &R, packages: &[String]) -> Result<(), InstallError> {
    let commands = plan(packages);
    if commands.is_empty() {
        tracing::info!("No apt packages configured, skipping");
        return Ok(());
    }

    tracing::info!(count = packages.len(), packages = %packages.join(" "), "Installing apt packages");
    for command in &commands {
        runner.run(command).await?;
    }
    Ok(())
}
