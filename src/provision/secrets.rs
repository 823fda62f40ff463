//! Bot token and owner ID collection.
//!
//! # Responsibilities
//! - Validate the two secrets the bot needs
//! - Prompt for them interactively, re-asking on invalid input
//! - Accept pre-supplied values (flags / environment) without prompting
//! - Keep the token out of logs and debug output

use std::fmt;
use std::io::{BufRead, Write};

use thiserror::Error;

use crate::error::InstallError;

pub const BOT_TOKEN_KEY: &str = "BOT_TOKEN";
pub const OWNER_ID_KEY: &str = "OWNER_ID";

/// Attempts per secret before giving up.
pub const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("BOT_TOKEN must not be empty")]
    EmptyToken,

    #[error("BOT_TOKEN must not contain whitespace, control characters or backticks")]
    InvalidTokenChars,

    #[error("OWNER_ID must not be empty")]
    EmptyOwner,

    #[error("OWNER_ID must contain only digits, got '{0}'")]
    OwnerNotNumeric(String),

    #[error("OWNER_ID '{0}' is too large for a Discord ID")]
    OwnerOutOfRange(String),
}

/// Discord bot token. Opaque; rendered as `***` everywhere except
/// [`BotToken::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    pub fn parse(raw: &str) -> Result<Self, SecretError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(SecretError::EmptyToken);
        }
        if token
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '`')
        {
            return Err(SecretError::InvalidTokenChars);
        }
        Ok(Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(***)")
    }
}

impl fmt::Display for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Discord user ID of the bot owner (a numeric snowflake).
///
/// Keeps the digits exactly as entered so the env file round-trips them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId {
    digits: String,
    value: u64,
}

impl OwnerId {
    pub fn parse(raw: &str) -> Result<Self, SecretError> {
        let digits = raw.trim();
        if digits.is_empty() {
            return Err(SecretError::EmptyOwner);
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(SecretError::OwnerNotNumeric(digits.to_string()));
        }
        let value = digits
            .parse()
            .map_err(|_| SecretError::OwnerOutOfRange(digits.to_string()))?;
        Ok(Self {
            digits: digits.to_string(),
            value,
        })
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// The secrets written to the env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secrets {
    pub bot_token: BotToken,
    pub owner_id: OwnerId,
}

/// Values supplied up front, skipping the matching prompt.
#[derive(Debug, Clone, Default)]
pub struct PresetSecrets {
    pub bot_token: Option<String>,
    pub owner_id: Option<String>,
}

impl PresetSecrets {
    /// Reject malformed preset values up front, before any slow step runs.
    pub fn validate(&self) -> Result<(), SecretError> {
        if let Some(raw) = &self.bot_token {
            BotToken::parse(raw)?;
        }
        if let Some(raw) = &self.owner_id {
            OwnerId::parse(raw)?;
        }
        Ok(())
    }
}

/// Line-oriented prompt over any reader/writer pair (stdin/stdout in the
/// binary, in-memory buffers in tests).
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_line(&mut self, key: &str) -> Result<String, InstallError> {
        write!(self.output, "Enter your Discord {}: ", key)
            .and_then(|_| self.output.flush())
            .map_err(|e| InstallError::Input(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| InstallError::Input(e.to_string()))?;
        if read == 0 {
            return Err(InstallError::Input(format!(
                "unexpected end of input while reading {}",
                key
            )));
        }
        Ok(line)
    }

    /// Ask for `key` until `parse` accepts the answer or attempts run out.
    pub fn ask<T>(
        &mut self,
        key: &str,
        parse: impl Fn(&str) -> Result<T, SecretError>,
    ) -> Result<T, InstallError> {
        let mut attempt = 1;
        loop {
            let line = self.read_line(key)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(e) if attempt < MAX_ATTEMPTS => {
                    tracing::warn!(key, attempt, error = %e, "Rejected input");
                    writeln!(self.output, "{}", e).map_err(|e| InstallError::Input(e.to_string()))?;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Resolve both secrets, prompting for whichever was not preset.
pub fn collect<R: BufRead, W: Write>(
    preset: &PresetSecrets,
    prompter: &mut Prompter<R, W>,
) -> Result<Secrets, InstallError> {
    let bot_token = match &preset.bot_token {
        Some(raw) => BotToken::parse(raw)?,
        None => prompter.ask(BOT_TOKEN_KEY, BotToken::parse)?,
    };
    let owner_id = match &preset.owner_id {
        Some(raw) => OwnerId::parse(raw)?,
        None => prompter.ask(OWNER_ID_KEY, OwnerId::parse)?,
    };

    tracing::info!(owner_id = %owner_id, bot_token = %bot_token, "Secrets collected");
    Ok(Secrets { bot_token, owner_id })
}
