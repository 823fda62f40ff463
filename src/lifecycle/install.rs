//! Install pipeline.
//!
//! # Responsibilities
//! - Run the eight install steps strictly in order
//! - Stop at the first failing step; later steps never run
//! - Wrap each step in a tracing span tagged with the run ID
//!
//! ```text
//! preflight → packages → venv → payload → secrets → env_file → unit → service
//! ```

use std::fmt;
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::InstallerConfig;
use crate::error::InstallError;
use crate::provision::payload::PayloadOutcome;
use crate::provision::secrets::{PresetSecrets, Prompter};
use crate::provision::{env_file, packages, payload, secrets, service, unit, venv};
use crate::system::fs::{MODE_PUBLIC, MODE_SECRET};
use crate::system::privilege::check_root;
use crate::system::{CommandRunner, FileOps};

/// Install steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Preflight,
    Packages,
    Venv,
    Payload,
    Secrets,
    EnvFile,
    Unit,
    Service,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::Preflight,
        Step::Packages,
        Step::Venv,
        Step::Payload,
        Step::Secrets,
        Step::EnvFile,
        Step::Unit,
        Step::Service,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Step::Preflight => "preflight",
            Step::Packages => "packages",
            Step::Venv => "venv",
            Step::Payload => "payload",
            Step::Secrets => "secrets",
            Step::EnvFile => "env_file",
            Step::Unit => "unit",
            Step::Service => "service",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-run switches from the command line.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub skip_packages: bool,
    pub start_service: bool,
    pub force_payload: bool,
    pub secrets: PresetSecrets,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            skip_packages: false,
            start_service: true,
            force_payload: false,
            secrets: PresetSecrets::default(),
        }
    }
}

/// Summary of a finished install.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub run_id: Uuid,
    pub completed: Vec<Step>,
    pub payload: PayloadOutcome,
    pub env_file: PathBuf,
    pub unit_file: PathBuf,
}

pub struct Installer<'a, R> {
    config: &'a InstallerConfig,
    runner: R,
    files: FileOps,
    euid: u32,
    options: InstallOptions,
}

impl<'a, R: CommandRunner> Installer<'a, R> {
    /// `euid` is the caller's effective uid, resolved by
    /// [`crate::system::privilege::effective_uid`] in the binary.
    pub fn new(config: &'a InstallerConfig, runner: R, files: FileOps, euid: u32) -> Self {
        Self {
            config,
            runner,
            files,
            euid,
            options: InstallOptions::default(),
        }
    }

    pub fn with_options(mut self, options: InstallOptions) -> Self {
        self.options = options;
        self
    }

    /// Run every step, prompting through `prompter` for missing secrets.
    pub async fn run<I: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<I, W>,
    ) -> Result<InstallReport, InstallError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("install", %run_id, service = %self.config.service.name);
        self.run_steps(run_id, prompter).instrument(span).await
    }

    async fn run_steps<I: BufRead, W: Write>(
        &self,
        run_id: Uuid,
        prompter: &mut Prompter<I, W>,
    ) -> Result<InstallReport, InstallError> {
        let config = self.config;
        let started = Instant::now();
        let mut completed = Vec::with_capacity(Step::ALL.len());

        tracing::info!(
            install_dir = %config.install_dir().display(),
            unit = %config.unit_path().display(),
            dry_run = self.files.is_dry_run(),
            "Starting install"
        );

        self.step(Step::Preflight, async { self.preflight() }).await?;
        completed.push(Step::Preflight);

        self.step(Step::Packages, async {
            if self.options.skip_packages {
                tracing::info!("Package installation skipped");
                return Ok(());
            }
            packages::install(&self.runner, &config.packages.apt).await
        })
        .await?;
        completed.push(Step::Packages);

        self.step(Step::Venv, venv::setup(&self.runner, &self.files, config))
            .await?;
        completed.push(Step::Venv);

        let payload = self
            .step(Step::Payload, async {
                payload::install(config, &self.files, self.options.force_payload)
            })
            .await?;
        completed.push(Step::Payload);

        let secrets = self
            .step(Step::Secrets, async {
                secrets::collect(&self.options.secrets, prompter)
            })
            .await?;
        completed.push(Step::Secrets);

        let env_path = config.env_file_path();
        self.step(Step::EnvFile, async {
            self.files
                .write(&env_path, &env_file::render(&secrets), MODE_SECRET)
                .map_err(|e| InstallError::io("cannot write", &env_path, e))
        })
        .await?;
        completed.push(Step::EnvFile);

        let unit_path = config.unit_path();
        self.step(Step::Unit, async {
            self.files
                .create_dir_all(&config.paths.unit_dir)
                .map_err(|e| InstallError::io("cannot create", &config.paths.unit_dir, e))?;
            self.files
                .write(&unit_path, &unit::render(config), MODE_PUBLIC)
                .map_err(|e| InstallError::io("cannot write", &unit_path, e))
        })
        .await?;
        completed.push(Step::Unit);

        self.step(
            Step::Service,
            service::enable_and_start(&self.runner, &config.unit_name(), self.options.start_service),
        )
        .await?;
        completed.push(Step::Service);

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Install complete"
        );

        Ok(InstallReport {
            run_id,
            completed,
            payload,
            env_file: env_path,
            unit_file: unit_path,
        })
    }

    fn preflight(&self) -> Result<(), InstallError> {
        if self.files.is_dry_run() && self.euid != 0 {
            tracing::warn!(euid = self.euid, "Not root; continuing because this is a dry run");
        } else {
            check_root(self.euid)?;
        }
        self.options.secrets.validate()?;
        Ok(())
    }

    async fn step<T, F>(&self, step: Step, fut: F) -> Result<T, InstallError>
    where
        F: Future<Output = Result<T, InstallError>>,
    {
        let span = tracing::info_span!("step", step = step.name());
        async move {
            let started = Instant::now();
            tracing::debug!("Step started");
            match fut.await {
                Ok(value) => {
                    tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "Step done");
                    Ok(value)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Step failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        let names: Vec<_> = Step::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["preflight", "packages", "venv", "payload", "secrets", "env_file", "unit", "service"]
        );
    }

    #[test]
    fn test_default_options_start_service() {
        let options = InstallOptions::default();
        assert!(options.start_service);
        assert!(!options.skip_packages);
        assert!(!options.force_payload);
    }
}
