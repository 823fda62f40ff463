//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → InstallerConfig (validated, immutable)
//!     → CLI overrides applied in main
//!     → shared by reference with every provisioning step
//! ```
//!
//! All fields have defaults, so running without a config file installs the
//! stock `powerdev_vpsbot` layout.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{InstallerConfig, LogFormat};
pub use schema::{CommandConfig, LoggingConfig, PackagesConfig, PathsConfig, ServiceConfig};
pub use validation::{validate_log_level, ValidationError};
