//! Installer for the `powerdev_vpsbot` Discord bot service.
//!
//! Provisions a Debian/Ubuntu host: apt packages, a Python virtual
//! environment, a placeholder payload, the bot's secrets in an env file, and
//! a systemd unit that is enabled and started.

// Core subsystems
pub mod config;
pub mod lifecycle;
pub mod provision;
pub mod system;

// Cross-cutting concerns
pub mod error;
pub mod observability;

pub use config::InstallerConfig;
pub use error::InstallError;
pub use lifecycle::{InstallOptions, Installer};
