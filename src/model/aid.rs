use std::fmt;

/// Application identifier (ISO 7816-5)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Aid(Vec<u8>);

impl Aid {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length-prefixed encoding used inside GlobalPlatform INSTALL data
    pub fn to_lv(&self) -> Vec<u8> {
        let mut lv = Vec::with_capacity(self.0.len() + 1);
        lv.push(self.0.len() as u8);
        lv.extend_from_slice(&self.0);
        lv
    }

    /// `4F` tagged encoding used by DELETE
    pub fn to_tlv(&self) -> Vec<u8> {
        let mut tlv = vec![0x4F];
        tlv.extend(self.to_lv());
        tlv
    }
}

impl fmt::Debug for Aid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aid({})", hex::encode_upper(&self.0))
    }
}

impl fmt::Display for Aid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.0))
    }
}

/// Identifiers the installer works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppletAids {
    /// Issuer security domain receiving load and install commands
    pub security_domain: Aid,
    /// Executable load file
    pub package: Aid,
    /// Applet class inside the package
    pub applet: Aid,
    /// Installed, selectable instance
    pub instance: Aid,
}

impl AppletAids {
    pub const SECURITY_DOMAIN: [u8; 8] = [0xA0, 0x00, 0x00, 0x01, 0x51, 0x00, 0x00, 0x00];

    pub const WALLET_PACKAGE: [u8; 7] = [0xA0, 0x00, 0x00, 0x08, 0x04, 0x00, 0x01];

    pub const WALLET_APPLET: [u8; 8] = [0xA0, 0x00, 0x00, 0x08, 0x04, 0x00, 0x01, 0x01];

    pub const WALLET_INSTANCE: [u8; 9] = [0xA0, 0x00, 0x00, 0x08, 0x04, 0x00, 0x01, 0x01, 0x01];
}

impl Default for AppletAids {
    fn default() -> Self {
        Self {
            security_domain: Aid(Self::SECURITY_DOMAIN.to_vec()),
            package: Aid(Self::WALLET_PACKAGE.to_vec()),
            applet: Aid(Self::WALLET_APPLET.to_vec()),
            instance: Aid(Self::WALLET_INSTANCE.to_vec()),
        }
    }
}
