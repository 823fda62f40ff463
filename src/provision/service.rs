//! systemd service control.

use serde::Serialize;

use crate::error::InstallError;
use crate::system::{CommandRunner, CommandSpec};

fn systemctl(args: &[&str]) -> CommandSpec {
    CommandSpec::new("systemctl").args(args.iter().copied())
}

/// Reload unit files, enable the service and (unless `start` is false)
/// restart it. `restart` starts a stopped unit too.
pub async fn enable_and_start<R: CommandRunner>(runner: &R, unit: &str, start: bool) -> Result<(), InstallError> {
    runner.run(&systemctl(&["daemon-reload"])).await?;
    runner.run(&systemctl(&["enable", unit])).await?;
    tracing::info!(unit, "Service enabled");

    if start {
        runner.run(&systemctl(&["restart", unit])).await?;
        tracing::info!(unit, "Service started");
    }
    Ok(())
}

/// Stop and disable the service. Failures are logged, not returned, since
/// the unit may already be gone.
pub async fn stop_and_disable<R: CommandRunner>(runner: &R, unit: &str) -> Result<(), InstallError> {
    for action in ["stop", "disable"] {
        let output = runner.output(&systemctl(&[action, unit])).await?;
        if !output.is_success() {
            tracing::warn!(unit, action, stderr = %output.stderr.trim(), "systemctl reported failure");
        }
    }
    Ok(())
}

pub async fn daemon_reload<R: CommandRunner>(runner: &R) -> Result<(), InstallError> {
    runner.run(&systemctl(&["daemon-reload"])).await?;
    Ok(())
}

/// Enabled/active state as reported by systemctl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceState {
    pub enabled: String,
    pub active: String,
}

impl ServiceState {
    pub fn is_running(&self) -> bool {
        self.active == "active"
    }
}

/// Query `is-enabled` and `is-active`. Non-zero exits describe a state
/// (e.g. `inactive`), so only spawn failures are errors.
pub async fn query<R: CommandRunner>(runner: &R, unit: &str) -> Result<ServiceState, InstallError> {
    let enabled = runner.output(&systemctl(&["is-enabled", unit])).await?;
    let active = runner.output(&systemctl(&["is-active", unit])).await?;
    Ok(ServiceState {
        enabled: state_word(&enabled.stdout),
        active: state_word(&active.stdout),
    })
}

fn state_word(stdout: &str) -> String {
    match stdout.trim() {
        "" => "unknown".to_string(),
        word => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_word() {
        assert_eq!(state_word("active\n"), "active");
        assert_eq!(state_word(""), "unknown");
    }
}
