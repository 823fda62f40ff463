//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every step and command produces:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → spans: install{run_id} → step{name}
//! ```
//!
//! Secret values are never recorded; the bot token formats as `***`.

pub mod logging;

pub use logging::init_logging;
