//! Ports (traits) for reader and applet operations
//!
//! These traits define the capabilities the session and dispatch use cases
//! require. They represent ports in hexagonal architecture - the core depends
//! on these abstractions, not on PC/SC or on a particular applet protocol.

mod card_connection;
mod installer;
mod reader_subsystem;

pub use card_connection::{CardConnection, Transmit};
pub use installer::Installer;
pub use reader_subsystem::{ReaderContext, ReaderSubsystem};

/// Connection type produced by a reader subsystem
pub type ConnectionOf<S> = <<S as ReaderSubsystem>::Context as ReaderContext>::Connection;
