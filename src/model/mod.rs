//! Domain types for applet management
//!
//! This module defines value types that wrap primitives to:
//! - Prevent primitive obsession
//! - Enforce invariants at construction
//! - Keep the PC/SC and APDU details out of the use cases

mod aid;
mod apdu;
mod command;
mod protocol;
mod reader;
mod secrets;
mod session_state;

pub use aid::{Aid, AppletAids};
pub use apdu::{CommandApdu, ResponseApdu, StatusWord};
pub use command::{Command, CommandKind};
pub use protocol::Protocol;
pub use reader::ReaderId;
pub use secrets::Secrets;
pub use session_state::SessionState;
