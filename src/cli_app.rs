//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use thiserror::Error;

use smart_health_notifier::core::config::Config;
use smart_health_notifier::core::errors::ShnError;
use smart_health_notifier::daemon::loop_main::{
    Monitor, SweepOptions, SweepReporter, alert_sent_line, healthy_line, unhealthy_line,
};
use smart_health_notifier::logger::jsonl::{LogFormat, Logger};

/// SMART Health Notifier: mails the operator when a disk reports trouble.
#[derive(Debug, Parser)]
#[command(
    name = "shn",
    author,
    version,
    about = "SMART Health Notifier - disk health checks with email alerts",
    long_about = None
)]
pub struct Cli {
    /// Pre-load settings from a key=value file (takes precedence over ENVFILE).
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,
    /// Write diagnostic log lines as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Also log informational events.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Subcommand to execute; defaults to `run`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Check every configured device, sleeping CHECK_INTERVAL after each.
    Run,
    /// Check devices once, without sleeping between them.
    Check(CheckArgs),
    /// Print the effective configuration (password redacted).
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct CheckArgs {
    /// Report unhealthy devices without sending email.
    #[arg(long)]
    no_notify: bool,
    /// Devices to check (falls back to DEVICES when omitted).
    #[arg(value_name = "DEVICE")]
    devices: Vec<String>,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Print as TOML instead of JSON.
    #[arg(long)]
    toml: bool,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Startup failure from the library (configuration, env file).
    #[error("{0}")]
    Startup(#[from] ShnError),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color || !io::stdout().is_terminal() {
        control::set_override(false);
    }

    match &cli.command {
        None | Some(Command::Run) => run_sweep(cli),
        Some(Command::Check(args)) => run_check(cli, args),
        Some(Command::Config(args)) => run_config(cli, args),
        Some(Command::Completions(args)) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn logger(cli: &Cli) -> Logger {
    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    Logger::stderr(format, cli.verbose)
}

fn run_sweep(cli: &Cli) -> Result<(), CliError> {
    let logger = logger(cli);
    let config = Config::load(cli.env_file.as_deref(), &logger)?;
    let monitor = Monitor::from_config(&config, &logger);
    monitor.sweep(
        &config.devices,
        &SweepOptions::from_config(&config),
        &mut ConsoleReporter,
    );
    Ok(())
}

fn run_check(cli: &Cli, args: &CheckArgs) -> Result<(), CliError> {
    let logger = logger(cli);
    let config = Config::load(cli.env_file.as_deref(), &logger)?;
    let devices = if args.devices.is_empty() {
        config.devices.clone()
    } else {
        args.devices.clone()
    };
    let options = SweepOptions {
        interval: Duration::ZERO,
        notify: !args.no_notify,
    };
    Monitor::from_config(&config, &logger).sweep(&devices, &options, &mut ConsoleReporter);
    Ok(())
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    let logger = logger(cli);
    let config = Config::load(cli.env_file.as_deref(), &logger)?;
    let rendered = if args.toml {
        config.to_toml()?
    } else {
        config.to_json()?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered.trim_end())?;
    Ok(())
}

/// Status lines on stdout, colored when attached to a terminal.
struct ConsoleReporter;

impl SweepReporter for ConsoleReporter {
    fn healthy(&mut self, device: &str) {
        println!("{}", healthy_line(device).green());
    }

    fn unhealthy(&mut self, device: &str, notifying: bool) {
        println!("{}", unhealthy_line(device, notifying).yellow().bold());
    }

    fn alert_sent(&mut self, _device: &str) {
        println!("{}", alert_sent_line().cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["shn"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn check_accepts_devices_and_no_notify() {
        let cli =
            Cli::try_parse_from(["shn", "check", "--no-notify", "/dev/sda", "/dev/nvme0n1"])
                .unwrap();
        match cli.command {
            Some(Command::Check(args)) => {
                assert!(args.no_notify);
                assert_eq!(args.devices, vec!["/dev/sda", "/dev/nvme0n1"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shn",
            "config",
            "--toml",
            "--env-file",
            "/etc/shn.env",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.env_file, Some(PathBuf::from("/etc/shn.env")));
        assert!(matches!(cli.command, Some(Command::Config(ConfigArgs { toml: true }))));
    }
}
