//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Install (install.rs):
//!     Preflight → Packages → Venv → Payload → Secrets → Env file → Unit → Service
//!
//! Uninstall (uninstall.rs):
//!     Stop + disable → Remove unit → daemon-reload → (purge) remove install dir
//!
//! Status (status.rs):
//!     Probe files → Read env keys → systemctl is-enabled / is-active
//!
//! Render (render.rs):
//!     Generate every file in memory → stdout
//! ```
//!
//! Install is fail-fast: the first failing step aborts the run with no
//! retry, and its error decides the process exit code.

pub mod install;
pub mod render;
pub mod status;
pub mod uninstall;

pub use install::{InstallOptions, InstallReport, Installer, Step};
pub use status::StatusReport;
pub use uninstall::UninstallReport;
