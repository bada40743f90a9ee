//! Install, query, delete and initialise the wallet applet on a smartcard
//! reached through PC/SC.

pub mod adapters;
pub mod api;
pub mod config;
pub mod error;
mod logic;
pub mod model;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{Config, LogLevel};
pub use error::{AppletError, AppletResult, CommandError, UsageError};
pub use model::{Command, CommandKind};

// Re-export public API
pub use api::{run, run_with_config};
