//! Adapters - concrete implementations of ports (traits)

mod card_installer;
mod pcsc_reader;

#[cfg(test)]
pub mod fake_card;
#[cfg(test)]
pub mod fake_installer;

// Re-export for convenience
pub use card_installer::CardInstaller;
pub use pcsc_reader::{PcscConnection, PcscContext, PcscReaderSubsystem};
