//! Card connection traits - exchanging APDUs with a connected card

use crate::error::{CardError, TeardownError};
use crate::model::Protocol;

/// Capability to exchange raw APDUs with a card
pub trait Transmit {
    /// Send one command APDU and return the raw response, status word included
    fn transmit(&self, command: &[u8]) -> Result<Vec<u8>, CardError>;
}

impl<T: Transmit + ?Sized> Transmit for &T {
    fn transmit(&self, command: &[u8]) -> Result<Vec<u8>, CardError> {
        (**self).transmit(command)
    }
}

/// Open session with one card through one reader
pub trait CardConnection: Transmit {
    /// Protocol negotiated during connect, read through a status query
    fn active_protocol(&self) -> Result<Protocol, CardError>;

    /// Disconnect and reset the card
    fn disconnect(&mut self) -> Result<(), TeardownError>;
}
