//! Public entry points wiring the PC/SC adapter to the use cases

use std::io;

use crate::adapters::PcscReaderSubsystem;
use crate::config::Config;
use crate::error::AppletResult;
use crate::use_cases::execute_command;

pub use crate::model::*;

/// Run `command` on the card of the only connected reader, reporting to stdout
pub fn run(command: &Command) -> AppletResult<()> {
    let subsystem = PcscReaderSubsystem;
    let stdout = io::stdout();
    execute_command(&subsystem, command, &mut stdout.lock())
}

pub fn run_with_config(config: &Config) -> AppletResult<()> {
    run(&config.command)
}
