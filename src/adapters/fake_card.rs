//! In-memory card emulating the security domain and the wallet applet
//!
//! It answers the APDUs the card installer sends, keeping just enough state
//! to make install, delete and init observable. Clones share the same card.

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::rc::Rc;

#[cfg(test)]
use crate::error::CardError;
#[cfg(test)]
use crate::model::AppletAids;
#[cfg(test)]
use crate::ports::Transmit;

#[cfg(test)]
const SW_SUCCESS: [u8; 2] = [0x90, 0x00];
#[cfg(test)]
const SW_SECURITY_NOT_SATISFIED: [u8; 2] = [0x69, 0x82];
#[cfg(test)]
const SW_CONDITIONS_NOT_SATISFIED: [u8; 2] = [0x69, 0x85];
#[cfg(test)]
const SW_FILE_NOT_FOUND: [u8; 2] = [0x6A, 0x82];
#[cfg(test)]
const SW_INCORRECT_P1_P2: [u8; 2] = [0x6A, 0x86];
#[cfg(test)]
const SW_REFERENCED_DATA_NOT_FOUND: [u8; 2] = [0x6A, 0x88];
#[cfg(test)]
const SW_INS_NOT_SUPPORTED: [u8; 2] = [0x6D, 0x00];

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selected {
    SecurityDomain,
    Instance,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct CardState {
    selected: Option<Selected>,
    package_present: bool,
    instance_present: bool,
    initialized: bool,
    security_domain_locked: bool,
    loading: Option<(u8, Vec<u8>)>,
    loaded_package: Option<Vec<u8>>,
    init_payload: Option<Vec<u8>>,
    chained_select: Option<Vec<u8>>,
    pending_response: VecDeque<Vec<u8>>,
    transmit_failure: Option<String>,
    commands: Vec<Vec<u8>>,
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FakeCard {
    state: Rc<RefCell<CardState>>,
    aids: AppletAids,
}

#[cfg(test)]
impl FakeCard {
    pub fn with_applet_installed() -> Self {
        let card = Self::default();
        {
            let mut state = card.state.borrow_mut();
            state.package_present = true;
            state.instance_present = true;
        }
        card
    }

    pub fn set_initialized(&self) {
        self.state.borrow_mut().initialized = true;
    }

    /// DELETE, INSTALL and LOAD are refused as if no secure channel was open
    pub fn lock_security_domain(&self) {
        self.state.borrow_mut().security_domain_locked = true;
    }

    /// Answer the next applet SELECT with `61xx` and hand `data` out in two GET RESPONSEs
    pub fn chain_select_response(&self, data: &[u8]) {
        self.state.borrow_mut().chained_select = Some(data.to_vec());
    }

    pub fn fail_transmit(&self, reason: &str) {
        self.state.borrow_mut().transmit_failure = Some(reason.to_string());
    }

    pub fn is_installed(&self) -> bool {
        self.state.borrow().instance_present
    }

    pub fn loaded_package(&self) -> Option<Vec<u8>> {
        self.state.borrow().loaded_package.clone()
    }

    pub fn init_payload(&self) -> Option<Vec<u8>> {
        self.state.borrow().init_payload.clone()
    }

    pub fn command_count(&self) -> usize {
        self.state.borrow().commands.len()
    }

    fn respond(&self, command: &[u8]) -> Vec<u8> {
        if command.len() < 4 {
            return SW_INS_NOT_SUPPORTED.to_vec();
        }
        let (cla, ins, p1, p2) = (command[0], command[1], command[2], command[3]);
        let data = match command.get(4) {
            Some(&lc) if command.len() > 5 => {
                let end = (5 + usize::from(lc)).min(command.len());
                &command[5..end]
            }
            _ => &[][..],
        };

        let mut state = self.state.borrow_mut();
        match (cla, ins) {
            (0x00, 0xA4) => self.select(&mut state, data),
            (0x00, 0xC0) => state
                .pending_response
                .pop_front()
                .unwrap_or_else(|| SW_CONDITIONS_NOT_SATISFIED.to_vec()),
            (0x80, 0xE4) => Self::delete(&mut state, &self.aids, data),
            (0x80, 0xE6) if p1 == 0x02 => Self::install_for_load(&mut state),
            (0x80, 0xE6) if p1 == 0x0C => Self::install_for_install(&mut state),
            (0x80, 0xE8) => Self::load(&mut state, p1, p2, data),
            (0x80, 0xFE) => Self::init(&mut state, data),
            _ => SW_INS_NOT_SUPPORTED.to_vec(),
        }
    }

    fn select(&self, state: &mut CardState, aid: &[u8]) -> Vec<u8> {
        if aid == self.aids.security_domain.as_bytes() {
            state.selected = Some(Selected::SecurityDomain);
            return SW_SUCCESS.to_vec();
        }
        if aid == self.aids.instance.as_bytes() && state.instance_present {
            state.selected = Some(Selected::Instance);
            if let Some(data) = state.chained_select.take() {
                let (first, second) = data.split_at(data.len() / 2);
                let mut first = first.to_vec();
                first.extend_from_slice(&[0x61, second.len() as u8]);
                let mut second = second.to_vec();
                second.extend_from_slice(&SW_SUCCESS);
                state.pending_response.extend([first, second]);
                return vec![0x61, data.len() as u8];
            }
            return SW_SUCCESS.to_vec();
        }
        state.selected = None;
        SW_FILE_NOT_FOUND.to_vec()
    }

    fn security_domain_ready(state: &CardState) -> Result<(), Vec<u8>> {
        if state.selected != Some(Selected::SecurityDomain) {
            return Err(SW_CONDITIONS_NOT_SATISFIED.to_vec());
        }
        if state.security_domain_locked {
            return Err(SW_SECURITY_NOT_SATISFIED.to_vec());
        }
        Ok(())
    }

    fn delete(state: &mut CardState, aids: &AppletAids, data: &[u8]) -> Vec<u8> {
        if let Err(sw) = Self::security_domain_ready(state) {
            return sw;
        }
        let aid = match data {
            [0x4F, len, aid @ ..] if aid.len() == usize::from(*len) => aid,
            _ => return SW_INCORRECT_P1_P2.to_vec(),
        };

        if aid == aids.instance.as_bytes() && state.instance_present {
            state.instance_present = false;
            state.initialized = false;
            SW_SUCCESS.to_vec()
        } else if aid == aids.package.as_bytes() && state.package_present {
            state.package_present = false;
            state.instance_present = false;
            state.initialized = false;
            SW_SUCCESS.to_vec()
        } else {
            SW_REFERENCED_DATA_NOT_FOUND.to_vec()
        }
    }

    fn install_for_load(state: &mut CardState) -> Vec<u8> {
        if let Err(sw) = Self::security_domain_ready(state) {
            return sw;
        }
        if state.package_present {
            return SW_CONDITIONS_NOT_SATISFIED.to_vec();
        }
        state.loading = Some((0, Vec::new()));
        SW_SUCCESS.to_vec()
    }

    fn load(state: &mut CardState, p1: u8, block: u8, data: &[u8]) -> Vec<u8> {
        if let Err(sw) = Self::security_domain_ready(state) {
            return sw;
        }
        let Some((expected, buffer)) = state.loading.as_mut() else {
            return SW_CONDITIONS_NOT_SATISFIED.to_vec();
        };
        if block != *expected {
            return SW_INCORRECT_P1_P2.to_vec();
        }
        buffer.extend_from_slice(data);
        *expected = expected.wrapping_add(1);

        if p1 & 0x80 != 0 {
            let Some((_, buffer)) = state.loading.take() else {
                return SW_CONDITIONS_NOT_SATISFIED.to_vec();
            };
            match unwrap_data_block(&buffer) {
                Some(package) => {
                    state.loaded_package = Some(package);
                    state.package_present = true;
                }
                None => return SW_CONDITIONS_NOT_SATISFIED.to_vec(),
            }
        }
        SW_SUCCESS.to_vec()
    }

    fn install_for_install(state: &mut CardState) -> Vec<u8> {
        if let Err(sw) = Self::security_domain_ready(state) {
            return sw;
        }
        if !state.package_present || state.instance_present {
            return SW_CONDITIONS_NOT_SATISFIED.to_vec();
        }
        state.instance_present = true;
        SW_SUCCESS.to_vec()
    }

    fn init(state: &mut CardState, data: &[u8]) -> Vec<u8> {
        if state.selected != Some(Selected::Instance) {
            return SW_CONDITIONS_NOT_SATISFIED.to_vec();
        }
        if state.initialized {
            return SW_INS_NOT_SUPPORTED.to_vec();
        }
        state.initialized = true;
        state.init_payload = Some(data.to_vec());
        SW_SUCCESS.to_vec()
    }
}

/// Strip the `C4` tag and BER length from a load file data block
#[cfg(test)]
fn unwrap_data_block(block: &[u8]) -> Option<Vec<u8>> {
    let (length, body) = match block {
        [0xC4, 0x81, len, body @ ..] => (usize::from(*len), body),
        [0xC4, 0x82, hi, lo, body @ ..] => (usize::from(u16::from_be_bytes([*hi, *lo])), body),
        [0xC4, len, body @ ..] if *len < 0x80 => (usize::from(*len), body),
        _ => return None,
    };
    (body.len() == length).then(|| body.to_vec())
}

#[cfg(test)]
impl Transmit for FakeCard {
    fn transmit(&self, command: &[u8]) -> Result<Vec<u8>, CardError> {
        if let Some(reason) = self.state.borrow().transmit_failure.clone() {
            return Err(CardError::Transmit { reason });
        }
        self.state.borrow_mut().commands.push(command.to_vec());
        Ok(self.respond(command))
    }
}
