use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::UsageError;

/// Name of a command, as typed with `-c`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Install,
    Status,
    Delete,
    Init,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Install,
        CommandKind::Status,
        CommandKind::Delete,
        CommandKind::Init,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Install => "install",
            CommandKind::Status => "status",
            CommandKind::Delete => "delete",
            CommandKind::Init => "init",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = UsageError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| UsageError::UnknownCommand {
                name: name.to_string(),
            })
    }
}

/// A fully validated command, carrying only the parameters it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Install { cap_file: PathBuf, overwrite: bool },
    Status,
    Delete,
    Init,
}

impl Command {
    /// Build a command from raw flag values.
    ///
    /// Validation never touches the filesystem: an install needs a non-empty
    /// path, nothing more.
    pub fn from_flags(
        name: Option<&str>,
        cap_file: Option<&Path>,
        overwrite: bool,
    ) -> Result<Self, UsageError> {
        let kind = match name {
            None | Some("") => return Err(UsageError::MissingCommand),
            Some(name) => name.parse::<CommandKind>()?,
        };

        Ok(match kind {
            CommandKind::Install => {
                let cap_file = cap_file
                    .filter(|path| !path.as_os_str().is_empty())
                    .ok_or(UsageError::MissingCapFile)?;
                Command::Install {
                    cap_file: cap_file.to_path_buf(),
                    overwrite,
                }
            }
            CommandKind::Status => Command::Status,
            CommandKind::Delete => Command::Delete,
            CommandKind::Init => Command::Init,
        })
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Install { .. } => CommandKind::Install,
            Command::Status => CommandKind::Status,
            Command::Delete => CommandKind::Delete,
            Command::Init => CommandKind::Init,
        }
    }
}
