//! Provisioning steps.
//!
//! Each module owns one concern of the install and is driven in order by
//! `lifecycle::install`:
//!
//! ```text
//! packages.rs  → apt-get update / install
//! venv.rs      → install dir, python -m venv, pip install
//! payload.rs   → placeholder main.py
//! secrets.rs   → BOT_TOKEN / OWNER_ID prompts
//! env_file.rs  → export KEY="value" file (0600)
//! unit.rs      → <service>.service (0644)
//! service.rs   → systemctl daemon-reload / enable / restart
//! ```

pub mod env_file;
pub mod packages;
pub mod payload;
pub mod secrets;
pub mod service;
pub mod unit;
pub mod venv;
