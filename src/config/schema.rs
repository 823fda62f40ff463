//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the installer.
//! All types derive Serde traits for deserialization from config files, and
//! every section defaults to the stock `powerdev_vpsbot` layout.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the installer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct InstallerConfig {
    /// systemd service settings.
    pub service: ServiceConfig,

    /// Filesystem layout of the installation.
    pub paths: PathsConfig,

    /// OS and Python packages to install.
    pub packages: PackagesConfig,

    /// External command execution settings.
    pub commands: CommandConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl InstallerConfig {
    /// Directory holding the payload, env file and venv.
    pub fn install_dir(&self) -> PathBuf {
        self.paths.install_dir.clone()
    }

    /// Path of the placeholder application file.
    pub fn payload_path(&self) -> PathBuf {
        self.paths.install_dir.join(&self.paths.payload_name)
    }

    /// Path of the generated environment file.
    pub fn env_file_path(&self) -> PathBuf {
        self.paths.install_dir.join(&self.paths.env_file_name)
    }

    /// Root of the Python virtual environment.
    pub fn venv_dir(&self) -> PathBuf {
        self.paths.install_dir.join(&self.paths.venv_dir_name)
    }

    /// Interpreter inside the virtual environment.
    pub fn venv_python(&self) -> PathBuf {
        self.venv_dir().join("bin").join("python")
    }

    /// pip inside the virtual environment.
    pub fn venv_pip(&self) -> PathBuf {
        self.venv_dir().join("bin").join("pip")
    }

    /// Unit name as passed to `systemctl` (e.g. `powerdev_vpsbot.service`).
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.service.name)
    }

    /// Path of the generated systemd unit file.
    pub fn unit_path(&self) -> PathBuf {
        self.paths.unit_dir.join(self.unit_name())
    }
}

/// systemd service configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name; the unit file is `<name>.service`.
    pub name: String,

    /// `Description=` of the unit.
    pub description: String,

    /// Account the bot runs as.
    pub user: String,

    /// `Restart=` policy.
    pub restart: String,

    /// `RestartSec=` in seconds.
    pub restart_sec: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "powerdev_vpsbot".to_string(),
            description: "PowerDev VPS Discord Bot".to_string(),
            user: "root".to_string(),
            restart: "always".to_string(),
            restart_sec: 5,
        }
    }
}

/// Filesystem layout.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Install root (payload, env file, venv).
    pub install_dir: PathBuf,

    /// Directory the unit file is written to.
    pub unit_dir: PathBuf,

    /// Virtual environment directory name, relative to `install_dir`.
    pub venv_dir_name: String,

    /// Payload file name, relative to `install_dir`.
    pub payload_name: String,

    /// Env file name, relative to `install_dir`.
    pub env_file_name: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("/root/powerdev_vpsbot"),
            unit_dir: PathBuf::from("/etc/systemd/system"),
            venv_dir_name: "venv".to_string(),
            payload_name: "main.py".to_string(),
            env_file_name: ".env".to_string(),
        }
    }
}

/// Package lists.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PackagesConfig {
    /// Debian packages installed with `apt-get install -y`.
    pub apt: Vec<String>,

    /// Python packages installed into the venv.
    pub pip: Vec<String>,

    /// Interpreter used to create the venv.
    pub python: String,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            apt: [
                "python3",
                "python3-venv",
                "python3-pip",
                "git",
                "qemu-kvm",
                "qemu-utils",
                "tmate",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            pip: vec!["discord.py".to_string()],
            python: "python3".to_string(),
        }
    }
}

/// External command settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CommandConfig {
    /// Per-command timeout in seconds. apt and pip downloads are slow.
    pub timeout_secs: u64,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self { timeout_secs: 900 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
