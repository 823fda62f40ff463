//! End-to-end install pipeline tests against a sandboxed filesystem.

use std::fs;

use vpsbot_installer::lifecycle::{InstallOptions, Installer, Step};
use vpsbot_installer::provision::env_file;
use vpsbot_installer::provision::payload::{PayloadOutcome, PLACEHOLDER};
use vpsbot_installer::provision::secrets::PresetSecrets;
use vpsbot_installer::system::{DryRunRunner, FileOps};
use vpsbot_installer::InstallError;

mod common;

use common::{expected_install_commands, mode_of, prompter, sandbox_config, RecordingRunner};

const TOKEN: &str = "MTA5ODc2NTQzMjEwOTg3NjU0.GabcDE.xyz_123-456";
const OWNER: &str = "123456789012345678";

#[tokio::test]
async fn test_full_install_as_root() {
    let root = tempfile::tempdir().unwrap();
    let config = sandbox_config(root.path());
    let runner = RecordingRunner::new();

    let installer = Installer::new(&config, &runner, FileOps::new(false), 0);
    let mut input = prompter(&format!("{TOKEN}\n{OWNER}\n"));
    let report = installer.run(&mut input).await.unwrap();

    assert_eq!(report.completed, Step::ALL.to_vec());
    assert_eq!(report.payload, PayloadOutcome::Written);
    assert_eq!(runner.commands(), expected_install_commands(&config));

    // The four expected files/directories.
    assert!(config.install_dir().is_dir());
    assert!(config.venv_python().exists());
    assert_eq!(fs::read_to_string(config.payload_path()).unwrap(), PLACEHOLDER);
    assert!(config.env_file_path().exists());
    assert!(config.unit_path().exists());

    let unit = fs::read_to_string(config.unit_path()).unwrap();
    assert!(unit.contains("Restart=always\n"));
    assert!(unit.contains("User=root\n"));

    assert_eq!(mode_of(&config.env_file_path()), 0o600);
    assert_eq!(mode_of(&config.unit_path()), 0o644);
}

#[tokio::test]
async fn test_env_file_holds_exactly_the_entered_values() {
    let root = tempfile::tempdir().unwrap();
    let config = sandbox_config(root.path());
    let runner = RecordingRunner::new();

    let installer = Installer::new(&config, &runner, FileOps::new(false), 0);
    installer
        .run(&mut prompter(&format!("  {TOKEN}  \n{OWNER}\n")))
        .await
        .unwrap();

    let raw = fs::read_to_string(config.env_file_path()).unwrap();
    assert_eq!(
        raw,
        format!("export BOT_TOKEN=\"{TOKEN}\"\nexport OWNER_ID=\"{OWNER}\"\n")
    );

    let entries = env_file::read_entries(&config.env_file_path()).unwrap();
    assert_eq!(
        entries,
        vec![
            ("BOT_TOKEN".to_string(), TOKEN.to_string()),
            ("OWNER_ID".to_string(), OWNER.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_non_root_is_rejected_before_anything_runs() {
    let root = tempfile::tempdir().unwrap();
    let config = sandbox_config(root.path());
    let runner = RecordingRunner::new();

    let installer = Installer::new(&config, &runner, FileOps::new(false), 1000);
    let mut input = prompter(&format!("{TOKEN}\n{OWNER}\n"));
    let err = installer.run(&mut input).await.unwrap_err();

    assert!(matches!(err, InstallError::NotRoot { euid: 1000 }));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("must be run as root"));
    assert!(runner.commands().is_empty());
    assert!(!config.install_dir().exists());

    let (_, printed) = input.into_inner();
    assert!(printed.is_empty(), "no prompt before the root check");
}

#[tokio::test]
async fn test_rerun_reuses_venv_and_keeps_payload() {
    let root = tempfile::tempdir().unwrap();
    let config = sandbox_config(root.path());

    let first = RecordingRunner::new();
    Installer::new(&config, &first, FileOps::new(false), 0)
        .run(&mut prompter(&format!("{TOKEN}\n{OWNER}\n")))
        .await
        .unwrap();

    fs::write(config.payload_path(), "print('the real bot')\n").unwrap();

    let second = RecordingRunner::new();
    let report = Installer::new(&config, &second, FileOps::new(false), 0)
        .run(&mut prompter("new-token\n42\n"))
        .await
        .unwrap();

    assert_eq!(report.payload, PayloadOutcome::Preserved);
    assert!(!second.ran("-m venv"));
    assert!(second.ran("install --upgrade pip"));
    assert_eq!(
        fs::read_to_string(config.payload_path()).unwrap(),
        "print('the real bot')\n"
    );
    let env = fs::read_to_string(config.env_file_path()).unwrap();
    assert!(env.contains("export BOT_TOKEN=\"new-token\""));
    assert!(env.contains("export OWNER_ID=\"42\""));
}

#[tokio::test]
async fn test_options_skip_packages_and_start() {
    let root = tempfile::tempdir().unwrap();
    let config = sandbox_config(root.path());
    let runner = RecordingRunner::new();

    let options = InstallOptions {
        skip_packages: true,
        start_service: false,
        force_payload: false,
        secrets: PresetSecrets {
            bot_token: Some(TOKEN.to_string()),
            owner_id: Some(OWNER.to_string()),
        },
    };
    let mut input = prompter("");
    Installer::new(&config, &runner, FileOps::new(false), 0)
        .with_options(options)
        .run(&mut input)
        .await
        .unwrap();

    assert!(!runner.ran("apt-get"));
    assert!(runner.ran("systemctl enable powerdev_vpsbot.service"));
    assert!(!runner.ran("systemctl restart"));

    let (_, printed) = input.into_inner();
    assert!(printed.is_empty(), "preset secrets must not prompt");
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let root = tempfile::tempdir().unwrap();
    let config = sandbox_config(root.path());

    // Non-root is tolerated in dry-run mode.
    let report = Installer::new(&config, DryRunRunner, FileOps::new(true), 1000)
        .run(&mut prompter(&format!("{TOKEN}\n{OWNER}\n")))
        .await
        .unwrap();

    assert_eq!(report.completed.len(), 8);
    assert!(!config.install_dir().exists());
    assert!(!config.unit_path().exists());
}
