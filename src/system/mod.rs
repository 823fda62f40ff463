//! Host interaction subsystem.
//!
//! # Data Flow
//! ```text
//! provisioning step
//!     → CommandSpec (program, args, env)
//!     → CommandRunner
//!         - ProcessRunner (tokio::process + timeout)
//!         - DryRunRunner (log only)
//!     → CommandOutput / CommandError
//!
//! provisioning step
//!     → FileOps (write with mode, mkdir, remove; dry-run aware)
//! ```

pub mod command;
pub mod fs;
pub mod privilege;

pub use command::{CommandError, CommandOutput, CommandRunner, CommandSpec, DryRunRunner, ProcessRunner};
pub use fs::FileOps;
