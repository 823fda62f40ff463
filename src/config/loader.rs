//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::InstallerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<InstallerConfig, ConfigError> {
    let config: InstallerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<InstallerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}

/// Load `path` when given, otherwise fall back to the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<InstallerConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(InstallerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_invalid_values() {
        let err = parse_config(
            r#"
            [service]
            restart = "sometimes"

            [commands]
            timeout_secs = 0
            "#,
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("validation failed: "));
        assert!(msg.contains("service.restart"));
        assert!(msg.contains("commands.timeout_secs"));
    }

    #[test]
    fn test_parse_rejects_values_that_would_corrupt_the_unit() {
        let err = parse_config("[paths]\ninstall_dir = \"/opt/my bot\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors[0].field == "paths.install_dir"));

        let err = parse_config("[service]\ndescription = \"x\\nExecStartPre=/bin/rm -rf /tmp/z\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("service.description"));

        let err = parse_config("[logging]\nlevel = \"verbose\"\n").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_parse_error_on_bad_toml() {
        let err = parse_config("[service\nname = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/vpsbot.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/vpsbot.toml"));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config, InstallerConfig::default());
    }
}
