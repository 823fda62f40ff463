//! Effective-uid detection and the root preflight check.

use std::fs;

use crate::error::InstallError;
use crate::system::command::{CommandRunner, CommandSpec};

const PROC_STATUS: &str = "/proc/self/status";

/// Parse the effective uid out of `/proc/<pid>/status` contents.
///
/// The `Uid:` line lists real, effective, saved and filesystem uids.
pub fn parse_effective_uid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().nth(1))
        .and_then(|uid| uid.parse().ok())
}

/// Determine the effective uid of this process.
///
/// Reads `/proc/self/status`; falls back to `id -u` where procfs is missing.
pub async fn effective_uid<R: CommandRunner>(runner: &R) -> Result<u32, InstallError> {
    if let Some(uid) = fs::read_to_string(PROC_STATUS)
        .ok()
        .as_deref()
        .and_then(parse_effective_uid)
    {
        return Ok(uid);
    }

    tracing::debug!("procfs unavailable, asking `id -u`");
    let output = runner.run(&CommandSpec::new("id").arg("-u")).await?;
    output
        .stdout
        .trim()
        .parse()
        .map_err(|_| InstallError::Preflight(format!("unexpected `id -u` output: {:?}", output.stdout)))
}

/// Fail with [`InstallError::NotRoot`] unless `euid` is 0.
pub fn check_root(euid: u32) -> Result<(), InstallError> {
    if euid == 0 {
        Ok(())
    } else {
        Err(InstallError::NotRoot { euid })
    }
}
