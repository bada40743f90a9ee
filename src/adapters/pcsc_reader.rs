//! PC/SC implementation of the reader ports
//!
//! This module provides the concrete reader subsystem used by the binary,
//! built on the pcsc crate.

use std::ffi::CString;

use pcsc::{Card, Context, Disposition, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};
use tracing::{debug, trace};

use crate::error::{AcquisitionError, CardError, TeardownError};
use crate::model::{Protocol, ReaderId};
use crate::ports::{CardConnection, ReaderContext, ReaderSubsystem, Transmit};

/// PC/SC reader subsystem in user scope
#[derive(Debug, Clone, Copy, Default)]
pub struct PcscReaderSubsystem;

impl ReaderSubsystem for PcscReaderSubsystem {
    type Context = PcscContext;

    fn establish(&self) -> Result<Self::Context, AcquisitionError> {
        let context = Context::establish(Scope::User).map_err(|e| {
            AcquisitionError::ContextEstablishment {
                reason: e.to_string(),
            }
        })?;

        debug!("PC/SC context established");
        Ok(PcscContext {
            context: Some(context),
        })
    }
}

/// Established PC/SC context, `None` once released
pub struct PcscContext {
    context: Option<Context>,
}

impl PcscContext {
    fn live(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

impl ReaderContext for PcscContext {
    type Connection = PcscConnection;

    fn list_readers(&self) -> Result<Vec<ReaderId>, AcquisitionError> {
        let context = self
            .live()
            .ok_or_else(|| AcquisitionError::ReaderEnumeration {
                reason: "context already released".to_string(),
            })?;

        match context.list_readers_owned() {
            Ok(names) => Ok(names
                .into_iter()
                .map(|name| ReaderId::new(name.to_string_lossy().into_owned()))
                .collect()),
            // pcsc-lite reports an empty reader list as an error
            Err(pcsc::Error::NoReadersAvailable) => Ok(Vec::new()),
            Err(e) => Err(AcquisitionError::ReaderEnumeration {
                reason: e.to_string(),
            }),
        }
    }

    fn connect(&self, reader: &ReaderId) -> Result<Self::Connection, AcquisitionError> {
        let connect_failed = |reason: String| AcquisitionError::Connect {
            reader: reader.to_string(),
            reason,
        };

        let context = self
            .live()
            .ok_or_else(|| connect_failed("context already released".to_string()))?;
        let name = CString::new(reader.as_str()).map_err(|e| connect_failed(e.to_string()))?;

        let card = context
            .connect(&name, ShareMode::Shared, Protocols::ANY)
            .map_err(|e| connect_failed(e.to_string()))?;

        debug!(reader = %reader, "connected to card");
        Ok(PcscConnection { card: Some(card) })
    }

    fn release(&mut self) -> Result<(), TeardownError> {
        match self.context.take() {
            Some(context) => context.release().map_err(|(_, e)| TeardownError::Release {
                reason: e.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Connection to a card, `None` once disconnected
pub struct PcscConnection {
    card: Option<Card>,
}

impl PcscConnection {
    fn live(&self) -> Result<&Card, CardError> {
        self.card.as_ref().ok_or(CardError::Released)
    }
}

impl Transmit for PcscConnection {
    fn transmit(&self, command: &[u8]) -> Result<Vec<u8>, CardError> {
        let card = self.live()?;
        let mut buffer = [0u8; MAX_BUFFER_SIZE];

        trace!(command = %hex::encode_upper(command), "transmit");
        let response = card
            .transmit(command, &mut buffer)
            .map_err(|e| CardError::Transmit {
                reason: e.to_string(),
            })?;
        trace!(response = %hex::encode_upper(response), "received");

        Ok(response.to_vec())
    }
}

impl CardConnection for PcscConnection {
    fn active_protocol(&self) -> Result<Protocol, CardError> {
        let status = self
            .live()?
            .status2_owned()
            .map_err(|e| CardError::Status {
                reason: e.to_string(),
            })?;
        Ok(Protocol::from_pcsc(status.protocol2()))
    }

    fn disconnect(&mut self) -> Result<(), TeardownError> {
        match self.card.take() {
            Some(card) => card
                .disconnect(Disposition::ResetCard)
                .map_err(|(_, e)| TeardownError::Disconnect {
                    reason: e.to_string(),
                }),
            None => Ok(()),
        }
    }
}
