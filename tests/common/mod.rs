//! Shared utilities for integration testing.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

use vpsbot_installer::config::InstallerConfig;
use vpsbot_installer::provision::secrets::Prompter;
use vpsbot_installer::system::{CommandError, CommandOutput, CommandRunner, CommandSpec};

/// Canned reaction to a command whose rendering contains `pattern`.
#[derive(Clone)]
pub enum Scripted {
    Output(CommandOutput),
    Timeout,
}

/// Fake runner that records every command and answers from a script.
///
/// Unscripted commands succeed with empty output. `python -m venv <dir>`
/// creates `<dir>/bin/python` so later runs see an existing venv.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    script: Vec<(String, Scripted)>,
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, pattern: &str, output: CommandOutput) -> Self {
        self.script.push((pattern.to_string(), Scripted::Output(output)));
        self
    }

    pub fn fail(self, pattern: &str, code: i32, stderr: &str) -> Self {
        self.respond(pattern, CommandOutput::failure(code, stderr))
    }

    pub fn time_out(mut self, pattern: &str) -> Self {
        self.script.push((pattern.to_string(), Scripted::Timeout));
        self
    }

    /// Every command issued so far, rendered as shell text.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    pub fn ran(&self, pattern: &str) -> bool {
        self.commands().iter().any(|c| c.contains(pattern))
    }
}

impl CommandRunner for RecordingRunner {
    async fn output(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let rendered = spec.to_string();
        self.calls.lock().unwrap().push(spec.clone());

        for (pattern, scripted) in &self.script {
            if rendered.contains(pattern.as_str()) {
                return match scripted {
                    Scripted::Output(output) => Ok(output.clone()),
                    Scripted::Timeout => Err(CommandError::Timeout {
                        command: rendered,
                        secs: 1,
                    }),
                };
            }
        }

        if spec.args.len() == 3 && spec.args[0] == "-m" && spec.args[1] == "venv" {
            let bin = Path::new(&spec.args[2]).join("bin");
            fs::create_dir_all(&bin).unwrap();
            fs::write(bin.join("python"), "").unwrap();
        }

        Ok(CommandOutput::success(""))
    }
}

/// A config rooted inside `root` instead of `/root` and `/etc`.
pub fn sandbox_config(root: &Path) -> InstallerConfig {
    let mut config = InstallerConfig::default();
    config.paths.install_dir = root.join("powerdev_vpsbot");
    config.paths.unit_dir = root.join("etc/systemd/system");
    config
}

/// Prompter fed with `input`, capturing what was printed.
pub fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

/// Commands a full default install issues, relative to `config`.
#[allow(dead_code)]
pub fn expected_install_commands(config: &InstallerConfig) -> Vec<String> {
    let venv = config.venv_dir();
    let pip = config.venv_pip();
    vec![
        "DEBIAN_FRONTEND=noninteractive apt-get update".to_string(),
        format!(
            "DEBIAN_FRONTEND=noninteractive apt-get install -y {}",
            config.packages.apt.join(" ")
        ),
        format!("python3 -m venv {}", venv.display()),
        format!("{} install --upgrade pip", pip.display()),
        format!("{} install discord.py", pip.display()),
        "systemctl daemon-reload".to_string(),
        "systemctl enable powerdev_vpsbot.service".to_string(),
        "systemctl restart powerdev_vpsbot.service".to_string(),
    ]
}

#[allow(dead_code)]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}
