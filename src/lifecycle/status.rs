//! Installation status report.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::config::InstallerConfig;
use crate::error::InstallError;
use crate::provision::env_file;
use crate::provision::service::{self, ServiceState};
use crate::system::CommandRunner;

#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub path: String,
    pub exists: bool,
}

impl FileStatus {
    fn probe(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            exists: path.exists(),
        }
    }
}

/// Everything `status` reports. Secret values never appear here, only the
/// keys defined in the env file.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub service: String,
    pub unit_file: FileStatus,
    pub env_file: FileStatus,
    /// `None` when the env file is missing or unreadable.
    pub env_keys: Option<Vec<String>>,
    pub payload: FileStatus,
    pub venv: FileStatus,
    pub state: ServiceState,
}

impl StatusReport {
    pub fn is_installed(&self) -> bool {
        self.unit_file.exists && self.env_file.exists && self.payload.exists && self.venv.exists
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mark(exists: bool) -> &'static str {
            if exists {
                "present"
            } else {
                "missing"
            }
        }

        writeln!(f, "service:   {}", self.service)?;
        writeln!(f, "enabled:   {}", self.state.enabled)?;
        writeln!(f, "active:    {}", self.state.active)?;
        writeln!(f, "unit file: {} ({})", self.unit_file.path, mark(self.unit_file.exists))?;
        writeln!(f, "env file:  {} ({})", self.env_file.path, mark(self.env_file.exists))?;
        match &self.env_keys {
            Some(keys) => writeln!(f, "env keys:  {}", keys.join(", "))?,
            None => writeln!(f, "env keys:  unavailable")?,
        }
        writeln!(f, "payload:   {} ({})", self.payload.path, mark(self.payload.exists))?;
        write!(f, "venv:      {} ({})", self.venv.path, mark(self.venv.exists))
    }
}

pub async fn status<R: CommandRunner>(config: &InstallerConfig, runner: &R) -> Result<StatusReport, InstallError> {
    let env_path = config.env_file_path();
    let env_keys = if env_path.exists() {
        match env_file::read_entries(&env_path) {
            Ok(entries) => Some(entries.into_iter().map(|(k, _)| k).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "Env file unreadable");
                None
            }
        }
    } else {
        None
    };

    let state = service::query(runner, &config.unit_name()).await?;

    Ok(StatusReport {
        service: config.service.name.clone(),
        unit_file: FileStatus::probe(&config.unit_path()),
        env_file: FileStatus::probe(&env_path),
        env_keys,
        payload: FileStatus::probe(&config.payload_path()),
        venv: FileStatus::probe(&config.venv_dir()),
        state,
    })
}
