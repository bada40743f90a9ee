//! Command dispatch use case
//!
//! Runs one validated command against an installer and writes the operator
//! facing report. Diagnostics go to the log; only the report goes to `out`.

use std::fs::File;
use std::io::Write;

use tracing::{debug, info};

use crate::error::{AppletResult, CommandError, InstallerError};
use crate::model::{Command, CommandKind, Secrets};
use crate::ports::Installer;

pub const INSTALLED_MESSAGE: &str = "applet installed successfully.";
pub const ALREADY_INSTALLED_MESSAGE: &str = "applet already installed";
pub const NOT_INSTALLED_MESSAGE: &str = "applet not installed";
pub const DELETED_MESSAGE: &str = "applet deleted";

/// Execute `command` through `installer`, reporting to `out`
///
/// # Errors
///
/// Returns `CommandError::Execution` carrying the installer's reason, or
/// `CommandError::Output` when the report cannot be written.
pub fn dispatch<I, W>(command: &Command, installer: &mut I, out: &mut W) -> AppletResult<()>
where
    I: Installer + ?Sized,
    W: Write + ?Sized,
{
    let kind = command.kind();
    debug!(command = %kind, "dispatching command");

    let failed = |source: InstallerError| CommandError::Execution {
        command: kind,
        source,
    };

    match command {
        Command::Install {
            cap_file,
            overwrite,
        } => {
            let mut file = File::open(cap_file).map_err(|source| {
                failed(InstallerError::CapFile {
                    path: cap_file.clone(),
                    source,
                })
            })?;
            installer.install(&mut file, *overwrite).map_err(failed)?;
            report(kind, out, |out| writeln!(out, "{}", INSTALLED_MESSAGE))?;
        }
        Command::Status => {
            let installed = installer.info().map_err(failed)?;
            info!(installed, "applet status");
            let message = if installed {
                ALREADY_INSTALLED_MESSAGE
            } else {
                NOT_INSTALLED_MESSAGE
            };
            report(kind, out, |out| writeln!(out, "{}", message))?;
        }
        Command::Delete => {
            installer.delete().map_err(failed)?;
            report(kind, out, |out| writeln!(out, "{}", DELETED_MESSAGE))?;
        }
        Command::Init => {
            let secrets = installer.init().map_err(failed)?;
            report(kind, out, |out| write_secrets(out, &secrets))?;
        }
    }

    Ok(())
}

fn write_secrets<W: Write + ?Sized>(out: &mut W, secrets: &Secrets) -> std::io::Result<()> {
    writeln!(out, "PIN {}", secrets.pin())?;
    writeln!(out, "PUK {}", secrets.puk())?;
    writeln!(out, "Pairing password: {}", secrets.pairing_pass())
}

fn report<W, F>(command: CommandKind, out: &mut W, write: F) -> Result<(), CommandError>
where
    W: Write + ?Sized,
    F: FnOnce(&mut W) -> std::io::Result<()>,
{
    write(out)
        .and_then(|()| out.flush())
        .map_err(|source| CommandError::Output { command, source })
}
