//! systemd unit generation.

use crate::config::InstallerConfig;

/// Render the service unit for `config`.
pub fn render(config: &InstallerConfig) -> String {
    let exec = format!(
        "/bin/bash -c 'set -a && . {} && exec {} {}'",
        config.env_file_path().display(),
        config.venv_python().display(),
        config.payload_path().display(),
    );

    format!(
        "[Unit]\n\
         Description={description}\n\
         After=network-online.target\n\
         Wants=network-online.target\n\
         \n\
         [Service]\n\
         Type=simple\n\
         User={user}\n\
         WorkingDirectory={workdir}\n\
         ExecStart={exec}\n\
         Restart={restart}\n\
         RestartSec={restart_sec}\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n",
        description = config.service.description,
        user = config.service.user,
        workdir = config.install_dir().display(),
        exec = exec,
        restart = config.service.restart,
        restart_sec = config.service.restart_sec,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_unit() {
        let unit = render(&InstallerConfig::default());
        let expected = "\
[Unit]
Description=PowerDev VPS Discord Bot
After=network-online.target
Wants=network-online.target

[Service]
Type=simple
User=root
WorkingDirectory=/root/powerdev_vpsbot
ExecStart=/bin/bash -c 'set -a && . /root/powerdev_vpsbot/.env && exec /root/powerdev_vpsbot/venv/bin/python /root/powerdev_vpsbot/main.py'
Restart=always
RestartSec=5

[Install]
WantedBy=multi-user.target
";
        assert_eq!(unit, expected);
    }

    #[test]
    fn test_unit_follows_config() {
        let mut config = InstallerConfig::default();
        config.service.user = "bot".into();
        config.service.restart = "on-failure".into();
        config.paths.install_dir = "/opt/vpsbot".into();

        let unit = render(&config);
        assert!(unit.contains("User=bot\n"));
        assert!(unit.contains("Restart=on-failure\n"));
        assert!(unit.contains("WorkingDirectory=/opt/vpsbot\n"));
        assert!(unit.contains(". /opt/vpsbot/.env && exec /opt/vpsbot/venv/bin/python /opt/vpsbot/main.py'"));
    }
}
