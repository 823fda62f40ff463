//! Placeholder application payload.
//!
//! The service runs `main.py` from the install directory. Until the real bot
//! is dropped in, a placeholder keeps the unit healthy: it checks that the
//! env file was sourced and then idles.

use crate::config::InstallerConfig;
use crate::error::InstallError;
use crate::system::fs::{FileOps, MODE_PUBLIC};

pub const PLACEHOLDER: &str = r#"# powerdev_vpsbot placeholder payload.
# Replace this file with the bot implementation; the service runs it with
# BOT_TOKEN and OWNER_ID exported from the .env file next to it.
import os
import sys
import time

TOKEN = os.getenv("BOT_TOKEN", "")
OWNER_ID = int(os.getenv("OWNER_ID", "0"))


def main():
    if not TOKEN or OWNER_ID == 0:
        print("BOT_TOKEN / OWNER_ID not set; check the .env file", file=sys.stderr)
        sys.exit(1)
    print(f"placeholder payload running for owner {OWNER_ID}; replace main.py with the bot")
    sys.stdout.flush()
    while True:
        time.sleep(3600)


if __name__ == "__main__":
    main()
"#;

/// What happened to the payload file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadOutcome {
    Written,
    /// An existing payload was left untouched.
    Preserved,
}

/// Write the placeholder unless a payload already exists (or `force` is set).
pub fn install(config: &InstallerConfig, files: &FileOps, force: bool) -> Result<PayloadOutcome, InstallError> {
    let path = config.payload_path();

    if path.exists() && !force {
        tracing::info!(path = %path.display(), "Existing payload kept (use --force-payload to overwrite)");
        return Ok(PayloadOutcome::Preserved);
    }

    files
        .write(&path, PLACEHOLDER, MODE_PUBLIC)
        .map_err(|e| InstallError::io("cannot write", &path, e))?;
    tracing::info!(path = %path.display(), "Placeholder payload written");
    Ok(PayloadOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> InstallerConfig {
        let mut config = InstallerConfig::default();
        config.paths.install_dir = dir.to_path_buf();
        config
    }

    #[test]
    fn test_placeholder_reads_both_secrets() {
        assert!(PLACEHOLDER.contains(r#"os.getenv("BOT_TOKEN""#));
        assert!(PLACEHOLDER.contains(r#"os.getenv("OWNER_ID""#));
    }

    #[test]
    fn test_existing_payload_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(config.payload_path(), "print('real bot')").unwrap();

        let outcome = install(&config, &FileOps::new(false), false).unwrap();
        assert_eq!(outcome, PayloadOutcome::Preserved);
        assert_eq!(
            std::fs::read_to_string(config.payload_path()).unwrap(),
            "print('real bot')"
        );
    }

    #[test]
    fn test_force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(config.payload_path(), "print('real bot')").unwrap();

        let outcome = install(&config, &FileOps::new(false), true).unwrap();
        assert_eq!(outcome, PayloadOutcome::Written);
        assert_eq!(std::fs::read_to_string(config.payload_path()).unwrap(), PLACEHOLDER);
    }
}
