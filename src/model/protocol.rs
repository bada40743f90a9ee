use std::fmt;

/// Transmission protocol negotiated with the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    T0,
    T1,
    Unknown,
}

impl Protocol {
    /// Map the protocol reported by PC/SC. Raw and absent protocols are unknown.
    pub fn from_pcsc(protocol: Option<pcsc::Protocol>) -> Self {
        match protocol {
            Some(pcsc::Protocol::T0) => Protocol::T0,
            Some(pcsc::Protocol::T1) => Protocol::T1,
            _ => Protocol::Unknown,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::T0 => f.write_str("T=0"),
            Protocol::T1 => f.write_str("T=1"),
            Protocol::Unknown => f.write_str("unknown"),
        }
    }
}
