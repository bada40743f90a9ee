//! Reader subsystem traits - establishing a context and reaching a card

use super::CardConnection;
use crate::error::{AcquisitionError, TeardownError};
use crate::model::ReaderId;

/// Entry point to the reader driver stack
pub trait ReaderSubsystem {
    type Context: ReaderContext;

    /// Establish a context. Exactly one is established per run.
    fn establish(&self) -> Result<Self::Context, AcquisitionError>;
}

/// Handle over the reader subsystem, able to enumerate readers and connect to cards
pub trait ReaderContext {
    type Connection: CardConnection;

    /// List the names of the connected readers
    ///
    /// An empty list is a valid answer; the selection policy decides what it means.
    fn list_readers(&self) -> Result<Vec<ReaderId>, AcquisitionError>;

    /// Connect to the card inserted in `reader`, sharing it with other applications
    fn connect(&self, reader: &ReaderId) -> Result<Self::Connection, AcquisitionError>;

    /// Release the context
    ///
    /// Called once, after every connection obtained from this context
    /// has been disconnected.
    fn release(&mut self) -> Result<(), TeardownError>;
}
