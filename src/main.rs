use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use vpsbot_installer::config::{load_or_default, validate_log_level, InstallerConfig};
use vpsbot_installer::lifecycle::{render, status, uninstall, InstallOptions, Installer};
use vpsbot_installer::observability::init_logging;
use vpsbot_installer::provision::secrets::{PresetSecrets, Prompter};
use vpsbot_installer::system::privilege::effective_uid;
use vpsbot_installer::system::{CommandRunner, DryRunRunner, FileOps, ProcessRunner};
use vpsbot_installer::InstallError;

#[derive(Parser)]
#[command(name = "vpsbot-installer", version)]
#[command(about = "Install the powerdev_vpsbot Discord bot as a systemd service", long_about = None)]
struct Cli {
    /// TOML config file overriding the default layout.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log commands and file writes instead of performing them.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error). RUST_LOG wins if set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    install: InstallArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Install and start the service (default)
    Install(InstallArgs),
    /// Show what is installed and whether the service runs
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stop, disable and remove the service
    Uninstall {
        /// Also delete the install directory (payload, secrets, venv)
        #[arg(long)]
        purge: bool,
    },
    /// Print every generated file without touching the system
    Render {
        #[arg(long, env = "OWNER_ID")]
        owner_id: Option<String>,
    },
}

#[derive(Args, Clone, Default)]
struct InstallArgs {
    /// Discord bot token; prompted for when absent.
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    bot_token: Option<String>,

    /// Discord user ID of the bot owner; prompted for when absent.
    #[arg(long, env = "OWNER_ID")]
    owner_id: Option<String>,

    /// Do not run apt-get.
    #[arg(long)]
    skip_packages: bool,

    /// Enable the service but do not start it.
    #[arg(long)]
    no_start: bool,

    /// Overwrite an existing payload with the placeholder.
    #[arg(long)]
    force_payload: bool,
}

impl From<InstallArgs> for InstallOptions {
    fn from(args: InstallArgs) -> Self {
        Self {
            skip_packages: args.skip_packages,
            start_service: !args.no_start,
            force_payload: args.force_payload,
            secrets: PresetSecrets {
                bot_token: args.bot_token,
                owner_id: args.owner_id,
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(level) = &cli.log_level {
        if let Err(e) = validate_log_level(level) {
            eprintln!("Error: --log-level {}", e.message);
            return ExitCode::FAILURE;
        }
        config.logging.level = level.clone();
    }

    init_logging(&config.logging);
    tracing::debug!(config = ?cli.config, dry_run = cli.dry_run, "Configuration loaded");

    let files = FileOps::new(cli.dry_run);
    let result = if cli.dry_run {
        dispatch(cli, &config, DryRunRunner, files).await
    } else {
        let runner = ProcessRunner::new(Duration::from_secs(config.commands.timeout_secs));
        dispatch(cli, &config, runner, files).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Installer failed");
            eprintln!("Error: {}", e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn dispatch<R: CommandRunner>(
    cli: Cli,
    config: &InstallerConfig,
    runner: R,
    files: FileOps,
) -> Result<(), InstallError> {
    // uid lookup must hit the real host even in dry-run mode.
    let probe = ProcessRunner::new(Duration::from_secs(10));

    match cli.command {
        None => install(config, runner, files, &probe, cli.install).await,
        Some(Commands::Install(args)) => install(config, runner, files, &probe, args).await,
        Some(Commands::Status { json }) => {
            let report = status::status(config, &runner).await?;
            if json {
                let doc = serde_json::to_string_pretty(&report)
                    .map_err(|e| InstallError::Output(e.to_string()))?;
                println!("{}", doc);
            } else {
                println!("{}", report);
            }
            Ok(())
        }
        Some(Commands::Uninstall { purge }) => {
            let euid = effective_uid(&probe).await?;
            let report = uninstall::uninstall(config, &runner, &files, euid, purge).await?;
            println!(
                "Removed {} ({})",
                config.unit_name(),
                if report.unit_removed { "unit file deleted" } else { "no unit file found" }
            );
            Ok(())
        }
        Some(Commands::Render { owner_id }) => {
            let preset = PresetSecrets {
                bot_token: None,
                owner_id,
            };
            print!("{}", render::preview(config, &preset)?);
            Ok(())
        }
    }
}

async fn install<R: CommandRunner>(
    config: &InstallerConfig,
    runner: R,
    files: FileOps,
    probe: &ProcessRunner,
    args: InstallArgs,
) -> Result<(), InstallError> {
    let euid = effective_uid(probe).await?;
    let installer = Installer::new(config, runner, files, euid).with_options(args.into());

    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
    let report = installer.run(&mut prompter).await?;

    println!(
        "{} installed: unit {}, env {} (run {})",
        config.service.name,
        report.unit_file.display(),
        report.env_file.display(),
        report.run_id
    );
    Ok(())
}
