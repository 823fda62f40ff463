//! Service removal.
//!
//! Reverses the install: stop + disable, drop the unit file, reload systemd.
//! The install directory (payload, secrets, venv) is only removed on purge.

use std::path::PathBuf;

use crate::config::InstallerConfig;
use crate::error::InstallError;
use crate::provision::service;
use crate::system::privilege::check_root;
use crate::system::{CommandRunner, FileOps};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub unit_file: PathBuf,
    pub unit_removed: bool,
    pub install_dir_removed: bool,
}

pub async fn uninstall<R: CommandRunner>(
    config: &InstallerConfig,
    runner: &R,
    files: &FileOps,
    euid: u32,
    purge: bool,
) -> Result<UninstallReport, InstallError> {
    if !(files.is_dry_run() && euid != 0) {
        check_root(euid)?;
    }

    let unit = config.unit_name();
    tracing::info!(unit = %unit, purge, "Uninstalling service");

    service::stop_and_disable(runner, &unit).await?;

    let unit_file = config.unit_path();
    let unit_removed = files
        .remove_file(&unit_file)
        .map_err(|e| InstallError::io("cannot remove", &unit_file, e))?;

    service::daemon_reload(runner).await?;

    let install_dir_removed = if purge {
        let dir = config.install_dir();
        files
            .remove_dir_all(&dir)
            .map_err(|e| InstallError::io("cannot remove", &dir, e))?
    } else {
        false
    };

    tracing::info!(unit_removed, install_dir_removed, "Uninstall complete");
    Ok(UninstallReport {
        unit_file,
        unit_removed,
        install_dir_removed,
    })
}
