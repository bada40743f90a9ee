//! Error types for applet-installer
//!
//! This module defines the error hierarchy for a single run of the tool.
//! Errors are grouped by the stage that produced them and use thiserror for
//! implementation. Every variant is fatal to the run except teardown errors,
//! which are only reported.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{CommandKind, StatusWord};

/// Result type alias for applet-installer operations
///
/// This is a convenience alias for `Result<T, AppletError>`.
pub type AppletResult<T> = Result<T, AppletError>;

/// Top-level error type for a run
#[derive(Error, Debug)]
pub enum AppletError {
    /// Reader context, reader selection or card connection could not be acquired
    #[error("Resource acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// Invalid or incomplete command line
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// The selected command failed
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

impl AppletError {
    /// Process exit code for this error. Every failure exits with 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Errors raised while acquiring the reader context and the card connection
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The reader subsystem refused to give us a context
    #[error("error establishing card context: {reason}")]
    ContextEstablishment { reason: String },

    /// Listing the connected readers failed
    #[error("error getting readers: {reason}")]
    ReaderEnumeration { reason: String },

    /// No reader is connected
    #[error("couldn't find any reader")]
    NoReaderFound,

    /// More than one reader is connected and none is picked on the operator's behalf
    #[error("too many readers found: {count} connected, exactly one is required")]
    AmbiguousReaderSelection { count: usize },

    /// Connecting to the card in the selected reader failed
    #[error("error connecting to card in reader {reader}: {reason}")]
    Connect { reader: String, reason: String },
}

/// Command line errors, always reported together with the usage text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("you must specify a command")]
    MissingCommand,

    #[error("you must specify a cap file path with the -f flag")]
    MissingCapFile,

    #[error("unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("invalid log level: {level}")]
    InvalidLogLevel { level: String },
}

/// Failures of the dispatched command
#[derive(Error, Debug)]
pub enum CommandError {
    /// The installer reported a failure
    #[error("error executing command {command}: {source}")]
    Execution {
        command: CommandKind,
        #[source]
        source: InstallerError,
    },

    /// The command succeeded but its report could not be written
    #[error("error writing output of command {command}: {source}")]
    Output {
        command: CommandKind,
        #[source]
        source: io::Error,
    },
}

impl CommandError {
    pub fn command(&self) -> CommandKind {
        match self {
            CommandError::Execution { command, .. } | CommandError::Output { command, .. } => {
                *command
            }
        }
    }
}

/// Errors releasing acquired hardware resources
///
/// These are reported in a `TeardownReport` and never decide the outcome of a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TeardownError {
    #[error("error disconnecting card: {reason}")]
    Disconnect { reason: String },

    #[error("error releasing context: {reason}")]
    Release { reason: String },
}

/// Errors talking to a connected card
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// Sending an APDU or receiving its response failed
    #[error("transmit failed: {reason}")]
    Transmit { reason: String },

    /// The card status (active protocol) could not be read
    #[error("error getting card status: {reason}")]
    Status { reason: String },

    /// The connection was already disconnected
    #[error("card connection already released")]
    Released,

    /// The response was shorter than a status word
    #[error("malformed response APDU: {length} bytes")]
    MalformedResponse { length: usize },

    /// The card kept announcing more data after this many GET RESPONSE rounds
    #[error("response still incomplete after {rounds} GET RESPONSE commands")]
    UnterminatedResponse { rounds: usize },
}

/// Failures reported by an installer
#[derive(Error, Debug)]
pub enum InstallerError {
    /// The cap file could not be opened or read
    #[error("error opening cap file {}: {source}", path.display())]
    CapFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cap file stream failed while being read
    #[error("error reading cap file: {source}")]
    CapFileRead {
        #[source]
        source: io::Error,
    },

    /// The cap file does not fit in a load sequence
    #[error("cap file too large: {size} bytes")]
    CapFileTooLarge { size: usize },

    /// Card communication failed
    #[error("card error: {0}")]
    Card(#[from] CardError),

    /// The card answered with a status word other than the expected one
    #[error("{operation} failed with status {status}")]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusWord,
    },

    /// Install was requested without overwrite and the applet is present
    #[error("applet already installed")]
    AlreadyInstalled,

    /// The applet must be installed for this operation
    #[error("applet not installed")]
    NotInstalled,

    /// Generic refusal with a human readable reason
    #[error("{reason}")]
    Rejected { reason: String },
}
