use std::fmt;

use rand::distr::Alphanumeric;
use rand::Rng;

/// Secrets generated while initializing the applet.
///
/// They are handed to the operator once and never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct Secrets {
    pin: String,
    puk: String,
    pairing_pass: String,
}

impl Secrets {
    pub const PIN_LENGTH: usize = 6;

    pub const PUK_LENGTH: usize = 12;

    pub const PAIRING_PASS_LENGTH: usize = 16;

    pub fn new(
        pin: impl Into<String>,
        puk: impl Into<String>,
        pairing_pass: impl Into<String>,
    ) -> Self {
        Self {
            pin: pin.into(),
            puk: puk.into(),
            pairing_pass: pairing_pass.into(),
        }
    }

    /// Draw a numeric PIN and PUK and an alphanumeric pairing password
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let pin = random_digits(rng, Self::PIN_LENGTH);
        let puk = random_digits(rng, Self::PUK_LENGTH);
        let pairing_pass = (0..Self::PAIRING_PASS_LENGTH)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        Self {
            pin,
            puk,
            pairing_pass,
        }
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn puk(&self) -> &str {
        &self.puk
    }

    pub fn pairing_pass(&self) -> &str {
        &self.pairing_pass
    }
}

fn random_digits<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secrets([REDACTED])")
    }
}
