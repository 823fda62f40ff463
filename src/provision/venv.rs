//! Install directory and Python virtual environment.

use crate::config::InstallerConfig;
use crate::error::InstallError;
use crate::system::{CommandRunner, CommandSpec, FileOps};

/// Create the install directory, the venv, and install pip packages into it.
///
/// An existing venv (detected by its `bin/python`) is reused; pip runs
/// either way so re-runs pick up new packages.
pub async fn setup<R: CommandRunner>(
    runner: &R,
    files: &FileOps,
    config: &InstallerConfig,
) -> Result<(), InstallError> {
    let install_dir = config.install_dir();
    files
        .create_dir_all(&install_dir)
        .map_err(|e| InstallError::io("cannot create", &install_dir, e))?;

    let venv_dir = config.venv_dir();
    if config.venv_python().exists() {
        tracing::info!(venv = %venv_dir.display(), "Reusing existing virtual environment");
    } else {
        tracing::info!(venv = %venv_dir.display(), python = %config.packages.python, "Creating virtual environment");
        runner
            .run(
                &CommandSpec::new(config.packages.python.as_str())
                    .args(["-m", "venv"])
                    .arg(venv_dir.display().to_string()),
            )
            .await?;
    }

    let pip = config.venv_pip();
    runner
        .run(&CommandSpec::from_path(&pip).args(["install", "--upgrade", "pip"]))
        .await?;

    if config.packages.pip.is_empty() {
        tracing::info!("No pip packages configured");
        return Ok(());
    }

    tracing::info!(packages = %config.packages.pip.join(" "), "Installing pip packages");
    runner
        .run(
            &CommandSpec::from_path(&pip)
                .arg("install")
                .args(config.packages.pip.iter().cloned()),
        )
        .await?;

    Ok(())
}
