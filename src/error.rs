//! Top-level installer error and its mapping to process exit codes.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::provision::secrets::SecretError;
use crate::system::CommandError;

/// Errors that abort an installer run.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The installer was not started with root privileges.
    #[error("This installer must be run as root (effective uid {euid})")]
    NotRoot { euid: u32 },

    #[error("preflight check failed: {0}")]
    Preflight(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("invalid secret: {0}")]
    Secret(#[from] SecretError),

    /// Interactive input could not be read (EOF, closed terminal).
    #[error("input error: {0}")]
    Input(String),

    #[error("malformed env file {}: {message}", path.display())]
    EnvFile { path: PathBuf, message: String },

    /// A report could not be serialized for output.
    #[error("output error: {0}")]
    Output(String),

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    ///
    /// A failed external command propagates its own exit status; anything
    /// without one exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::Command(e) => match e.exit_code() {
                Some(code) if code != 0 => code,
                _ => 1,
            },
            _ => 1,
        }
    }
}
