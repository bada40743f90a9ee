use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{debug, error};

use applet_installer::{AppletError, Config, LogLevel};

const COMMANDS_HELP: &str = "\
Commands:
  install  Load the applet from the cap file given with -f (-o replaces an installed one)
  status   Report whether the applet is installed
  delete   Remove the applet instance and package
  init     Initialise the applet with a fresh PIN, PUK and pairing password";

#[derive(Parser, Debug)]
#[command(name = "applet-installer")]
#[command(about = "Install and manage the wallet applet on a smartcard", version)]
#[command(after_help = COMMANDS_HELP)]
pub struct Cli {
    /// Command to run: install, status, delete or init
    #[arg(short = 'c', value_name = "COMMAND")]
    pub command: Option<String>,

    /// Cap file to load (install only)
    // raw: an empty path has to reach validation
    #[arg(short = 'f', value_name = "PATH")]
    pub cap_file: Option<OsString>,

    /// Replace the applet if it is already installed
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Log level: ERROR, WARN, INFO, DEBUG or TRACE
    #[arg(short = 'l', value_name = "LEVEL", default_value = "INFO")]
    pub log_level: String,
}

fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level.to_tracing_level())
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn print_usage() {
    println!("{}", Cli::command().render_help());
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            let _ = e.print();
            return code;
        }
    };

    let config = cli.log_level.parse::<LogLevel>().and_then(|log_level| {
        Config::from_flags(
            cli.command.as_deref(),
            cli.cap_file.as_deref().map(Path::new),
            cli.overwrite,
            log_level,
        )
    });

    let log_level = config.as_ref().map(|c| c.log_level).unwrap_or_default();
    if let Err(e) = init_logging(log_level) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid arguments");
            print_usage();
            return ExitCode::FAILURE;
        }
    };
    debug!(command = %config.command.kind(), level = %config.log_level, "starting");

    match applet_installer::run_with_config(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                AppletError::Command(command_error) => {
                    error!(command = %command_error.command(), error = %e, "command failed")
                }
                _ => error!(error = %e, "run failed"),
            }
            ExitCode::from(e.exit_code())
        }
    }
}
