//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that paths are absolute and file names are plain names
//! - Keep every value rendered into the unit free of characters that
//!   bash or systemd would reinterpret
//! - Validate value ranges (timeouts > 0, known restart policies)
//!
//! Returns all validation errors, not just the first.

use std::fmt;
use std::path::Path;

use crate::config::schema::InstallerConfig;

/// Values systemd accepts for `Restart=`.
pub const RESTART_POLICIES: &[&str] = &[
    "no",
    "always",
    "on-success",
    "on-failure",
    "on-abnormal",
    "on-abort",
    "on-watchdog",
];

/// Levels accepted for `logging.level` and `--log-level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `service.name`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &InstallerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.service.name;
    if name.is_empty() {
        errors.push(ValidationError::new("service.name", "must not be empty"));
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'))
    {
        errors.push(ValidationError::new(
            "service.name",
            format!("'{}' contains characters systemd does not allow in unit names", name),
        ));
    }

    let user = &config.service.user;
    if user.trim().is_empty() {
        errors.push(ValidationError::new("service.user", "must not be empty"));
    } else if !user
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        errors.push(ValidationError::new(
            "service.user",
            format!("'{}' is not a valid user name", user.escape_debug()),
        ));
    }

    if config.service.description.chars().any(char::is_control) {
        errors.push(ValidationError::new(
            "service.description",
            "must not contain newlines or control characters",
        ));
    }

    if !RESTART_POLICIES.contains(&config.service.restart.as_str()) {
        errors.push(ValidationError::new(
            "service.restart",
            format!(
                "'{}' is not one of {}",
                config.service.restart,
                RESTART_POLICIES.join(", ")
            ),
        ));
    }

    check_absolute(&mut errors, "paths.install_dir", &config.paths.install_dir);
    check_absolute(&mut errors, "paths.unit_dir", &config.paths.unit_dir);
    check_file_name(&mut errors, "paths.venv_dir_name", &config.paths.venv_dir_name);
    check_file_name(&mut errors, "paths.payload_name", &config.paths.payload_name);
    check_file_name(&mut errors, "paths.env_file_name", &config.paths.env_file_name);

    if config.packages.python.trim().is_empty() {
        errors.push(ValidationError::new("packages.python", "must not be empty"));
    }
    if config.packages.apt.iter().any(|p| p.trim().is_empty()) {
        errors.push(ValidationError::new("packages.apt", "contains an empty package name"));
    }
    if config.packages.pip.iter().any(|p| p.trim().is_empty()) {
        errors.push(ValidationError::new("packages.pip", "contains an empty package name"));
    }

    if config.commands.timeout_secs == 0 {
        errors.push(ValidationError::new("commands.timeout_secs", "must be greater than 0"));
    }

    if let Err(e) = validate_log_level(&config.logging.level) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a log level given in config or on the command line.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "logging.level",
            format!("'{}' is not one of {}", level, LOG_LEVELS.join(", ")),
        ))
    }
}

/// Characters allowed in paths that end up inside `ExecStart`.
///
/// Whitespace and quotes break the `bash -c` word, `%` and `$` are systemd
/// specifiers.
fn is_unit_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '@' | '+' | '-')
}

fn check_unit_safe(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) -> bool {
    if value.chars().all(is_unit_safe) {
        return true;
    }
    errors.push(ValidationError::new(
        field,
        format!(
            "'{}' may only contain letters, digits and / . _ @ + -",
            value.escape_debug()
        ),
    ));
    false
}

fn check_absolute(errors: &mut Vec<ValidationError>, field: &'static str, path: &Path) {
    if !path.is_absolute() {
        errors.push(ValidationError::new(
            field,
            format!("'{}' must be an absolute path", path.display()),
        ));
        return;
    }
    check_unit_safe(errors, field, &path.to_string_lossy());
}

fn check_file_name(errors: &mut Vec<ValidationError>, field: &'static str, name: &str) {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        errors.push(ValidationError::new(
            field,
            format!("'{}' must be a plain file name", name),
        ));
        return;
    }
    check_unit_safe(errors, field, name);
}
