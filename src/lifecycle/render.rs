//! Preview of every generated file, without touching the host.

use std::fmt::Write;

use crate::config::InstallerConfig;
use crate::error::InstallError;
use crate::provision::payload::PLACEHOLDER;
use crate::provision::secrets::{BotToken, OwnerId, PresetSecrets, Secrets};
use crate::provision::{env_file, unit};

/// Render the env file (token redacted), unit file and payload.
///
/// A preset owner ID is validated and shown; otherwise `0` stands in.
pub fn preview(config: &InstallerConfig, preset: &PresetSecrets) -> Result<String, InstallError> {
    let secrets = Secrets {
        bot_token: BotToken::parse("redacted")?,
        owner_id: OwnerId::parse(preset.owner_id.as_deref().unwrap_or("0"))?,
    };

    let mut out = String::new();
    let sections = [
        (config.env_file_path(), "600", env_file::render_redacted(&secrets)),
        (config.unit_path(), "644", unit::render(config)),
        (config.payload_path(), "644", PLACEHOLDER.to_string()),
    ];
    for (i, (path, mode, body)) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing into a String cannot fail.
        let _ = writeln!(out, "# {} (mode {})", path.display(), mode);
        out.push_str(body);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_has_three_sections() {
        let out = preview(&InstallerConfig::default(), &PresetSecrets::default()).unwrap();
        assert!(out.starts_with("# /root/powerdev_vpsbot/.env (mode 600)\nexport BOT_TOKEN=\"***\"\n"));
        assert!(out.contains("\n# /etc/systemd/system/powerdev_vpsbot.service (mode 644)\n[Unit]\n"));
        assert!(out.contains("\n# /root/powerdev_vpsbot/main.py (mode 644)\n"));
    }

    #[test]
    fn test_preview_never_shows_token() {
        let preset = PresetSecrets {
            bot_token: Some("very-secret".into()),
            owner_id: Some("123".into()),
        };
        let out = preview(&InstallerConfig::default(), &preset).unwrap();
        assert!(!out.contains("very-secret"));
        assert!(out.contains("export OWNER_ID=\"123\""));
    }

    #[test]
    fn test_preview_rejects_bad_owner() {
        let preset = PresetSecrets {
            bot_token: None,
            owner_id: Some("abc".into()),
        };
        assert!(preview(&InstallerConfig::default(), &preset).is_err());
    }
}
