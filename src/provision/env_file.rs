//! Environment file generation.
//!
//! The file is sourced by `bash` in the unit's `ExecStart`, so each secret is
//! an `export KEY="value"` line. The same file must also parse with
//! `dotenvy`, which `status` uses to report which keys are set.

use std::path::Path;

use crate::error::InstallError;
use crate::provision::secrets::{Secrets, BOT_TOKEN_KEY, OWNER_ID_KEY};

/// Quote `value` for a double-quoted shell word.
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Render the env file for `secrets`.
pub fn render(secrets: &Secrets) -> String {
    format!(
        "export {}={}\nexport {}={}\n",
        BOT_TOKEN_KEY,
        shell_quote(secrets.bot_token.expose()),
        OWNER_ID_KEY,
        shell_quote(secrets.owner_id.as_str()),
    )
}

/// Render with the token masked, for `render` output and logs.
pub fn render_redacted(secrets: &Secrets) -> String {
    format!(
        "export {}=\"***\"\nexport {}={}\n",
        BOT_TOKEN_KEY,
        OWNER_ID_KEY,
        shell_quote(secrets.owner_id.as_str()),
    )
}

/// Read an existing env file into `(key, value)` pairs, in file order.
pub fn read_entries(path: &Path) -> Result<Vec<(String, String)>, InstallError> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| dotenv_error(path, e))?;
    iter.map(|item| item.map_err(|e| dotenv_error(path, e)))
        .collect()
}

fn dotenv_error(path: &Path, error: dotenvy::Error) -> InstallError {
    match error {
        dotenvy::Error::Io(source) => InstallError::io("cannot read", path, source),
        other => InstallError::EnvFile {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}
