//! GlobalPlatform implementation of the installer port
//!
//! This module drives the card with plain APDUs: SELECT to probe the applet,
//! DELETE / INSTALL / LOAD addressed to the security domain, and the applet's
//! own INIT command. The cap file stream is forwarded without being parsed.

use std::io::Read;

use tracing::{debug, info};

use crate::error::InstallerError;
use crate::error::CardError;
use crate::logic::load_file::{load_blocks, load_file_data_block, LoadBlock, MAX_DATA_BLOCK_SIZE};
use crate::model::{Aid, AppletAids, CommandApdu, ResponseApdu, Secrets, StatusWord};
use crate::ports::{Installer, Transmit};

const CLA_GP: u8 = 0x80;
const INS_DELETE: u8 = 0xE4;
const INS_INSTALL: u8 = 0xE6;
const INS_LOAD: u8 = 0xE8;
const INS_INIT: u8 = 0xFE;

const INSTALL_FOR_LOAD: u8 = 0x02;
const INSTALL_FOR_INSTALL_AND_SELECTABLE: u8 = 0x0C;
const DELETE_RELATED_OBJECTS: u8 = 0x80;
const LOAD_LAST_BLOCK: u8 = 0x80;

/// GET RESPONSE rounds accepted for one command
const MAX_RESPONSE_CHAIN: usize = 64;

/// Installer talking to the card through any transmit capability
#[derive(Debug)]
pub struct CardInstaller<T> {
    card: T,
    aids: AppletAids,
}

impl<T: Transmit> CardInstaller<T> {
    /// Create an installer for the wallet applet
    pub fn new(card: T) -> Self {
        Self {
            card,
            aids: AppletAids::default(),
        }
    }

    /// Send a command and collect the full response, following `61xx` chaining
    fn exchange(&self, command: CommandApdu) -> Result<ResponseApdu, InstallerError> {
        let raw = self.card.transmit(&command.to_bytes())?;
        let mut response = ResponseApdu::from_bytes(&raw)?;
        let mut rounds = 0;

        while let Some(remaining) = response.status.bytes_remaining() {
            if rounds == MAX_RESPONSE_CHAIN {
                return Err(CardError::UnterminatedResponse { rounds }.into());
            }
            rounds += 1;
            let raw = self
                .card
                .transmit(&CommandApdu::get_response(remaining).to_bytes())?;
            let next = ResponseApdu::from_bytes(&raw)?;
            response.data.extend(next.data);
            response.status = next.status;
        }

        Ok(response)
    }

    fn expect_success(
        &self,
        operation: &'static str,
        command: CommandApdu,
    ) -> Result<ResponseApdu, InstallerError> {
        let response = self.exchange(command)?;
        if response.status.is_success() {
            Ok(response)
        } else {
            Err(InstallerError::UnexpectedStatus {
                operation,
                status: response.status,
            })
        }
    }

    fn select_security_domain(&self) -> Result<(), InstallerError> {
        self.expect_success(
            "SELECT security domain",
            CommandApdu::select(self.aids.security_domain.as_bytes()),
        )?;
        Ok(())
    }

    /// Select the applet instance; `Ok(false)` when the card does not know it
    fn select_instance(&self) -> Result<bool, InstallerError> {
        let response = self.exchange(CommandApdu::select(self.aids.instance.as_bytes()))?;
        match response.status {
            StatusWord::SUCCESS => Ok(true),
            StatusWord::FILE_NOT_FOUND => Ok(false),
            status => Err(InstallerError::UnexpectedStatus {
                operation: "SELECT applet",
                status,
            }),
        }
    }

    /// Delete one object; an object the card does not hold counts as deleted
    fn delete_object(&self, aid: &Aid, related: bool) -> Result<(), InstallerError> {
        let p2 = if related { DELETE_RELATED_OBJECTS } else { 0x00 };
        let command = CommandApdu::new(CLA_GP, INS_DELETE, 0x00, p2).with_data(aid.to_tlv());

        let response = self.exchange(command)?;
        match response.status {
            StatusWord::SUCCESS => {
                debug!(aid = %aid, "deleted");
                Ok(())
            }
            StatusWord::REFERENCED_DATA_NOT_FOUND => {
                debug!(aid = %aid, "nothing to delete");
                Ok(())
            }
            status => Err(InstallerError::UnexpectedStatus {
                operation: "DELETE",
                status,
            }),
        }
    }

    fn delete_applet(&self) -> Result<(), InstallerError> {
        self.select_security_domain()?;
        self.delete_object(&self.aids.instance, false)?;
        self.delete_object(&self.aids.package, true)
    }

    fn install_for_load(&self) -> Result<(), InstallerError> {
        let mut data = self.aids.package.to_lv();
        // default security domain, no hash, no parameters, no token
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        self.expect_success(
            "INSTALL [for load]",
            CommandApdu::new(CLA_GP, INS_INSTALL, INSTALL_FOR_LOAD, 0x00).with_data(data),
        )?;
        Ok(())
    }

    fn load(&self, blocks: &[LoadBlock<'_>]) -> Result<(), InstallerError> {
        debug!(blocks = blocks.len(), "loading package");

        for block in blocks {
            let p1 = if block.last { LOAD_LAST_BLOCK } else { 0x00 };
            self.expect_success(
                "LOAD",
                CommandApdu::new(CLA_GP, INS_LOAD, p1, block.number).with_data(block.data.to_vec()),
            )?;
        }
        Ok(())
    }

    fn install_for_install(&self) -> Result<(), InstallerError> {
        let mut data = self.aids.package.to_lv();
        data.extend(self.aids.applet.to_lv());
        data.extend(self.aids.instance.to_lv());
        // no privileges, empty applet parameters, no token
        data.extend_from_slice(&[0x01, 0x00, 0x02, 0xC9, 0x00, 0x00]);

        self.expect_success(
            "INSTALL [for install and make selectable]",
            CommandApdu::new(CLA_GP, INS_INSTALL, INSTALL_FOR_INSTALL_AND_SELECTABLE, 0x00)
                .with_data(data),
        )?;
        Ok(())
    }
}

impl<T: Transmit> Installer for CardInstaller<T> {
    fn install(&mut self, cap_file: &mut dyn Read, overwrite: bool) -> Result<(), InstallerError> {
        if self.select_instance()? && !overwrite {
            return Err(InstallerError::AlreadyInstalled);
        }

        // one byte past the limit is enough to tell an oversized file
        let mut package = Vec::new();
        cap_file
            .take(MAX_DATA_BLOCK_SIZE as u64 + 1)
            .read_to_end(&mut package)
            .map_err(|source| InstallerError::CapFileRead { source })?;
        if package.len() > MAX_DATA_BLOCK_SIZE {
            return Err(InstallerError::CapFileTooLarge {
                size: package.len(),
            });
        }

        // framing errors must surface before anything is deleted
        let data_block = load_file_data_block(&package)?;
        let blocks = load_blocks(&data_block)?;
        debug!(bytes = package.len(), "cap file read");

        self.delete_applet()?;
        self.install_for_load()?;
        self.load(&blocks)?;
        self.install_for_install()?;

        info!(instance = %self.aids.instance, "applet installed");
        Ok(())
    }

    fn info(&mut self) -> Result<bool, InstallerError> {
        self.select_instance()
    }

    fn delete(&mut self) -> Result<(), InstallerError> {
        self.delete_applet()?;
        info!(package = %self.aids.package, "applet deleted");
        Ok(())
    }

    fn init(&mut self) -> Result<Secrets, InstallerError> {
        if !self.select_instance()? {
            return Err(InstallerError::NotInstalled);
        }

        let secrets = Secrets::generate(&mut rand::rng());
        let mut data = Vec::with_capacity(
            Secrets::PIN_LENGTH + Secrets::PUK_LENGTH + Secrets::PAIRING_PASS_LENGTH,
        );
        data.extend_from_slice(secrets.pin().as_bytes());
        data.extend_from_slice(secrets.puk().as_bytes());
        data.extend_from_slice(secrets.pairing_pass().as_bytes());

        self.expect_success(
            "INIT",
            CommandApdu::new(CLA_GP, INS_INIT, 0x00, 0x00).with_data(data),
        )?;

        info!("applet initialized");
        Ok(secrets)
    }
}
