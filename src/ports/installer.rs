//! Installer trait - capability to manage the applet on a card

use std::io::Read;

use crate::error::InstallerError;
use crate::model::Secrets;

/// Capability to install, inspect, delete and initialize the applet
///
/// This trait abstracts the applet management protocol. Implementations own
/// whatever channel they need to the card; the session layer only drives them.
pub trait Installer {
    /// Install the applet from a cap file stream
    ///
    /// # Arguments
    ///
    /// * `cap_file` - The package to load, read to the end
    /// * `overwrite` - Replace an applet that is already installed
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// - The applet is present and `overwrite` is false
    /// - The stream cannot be read
    /// - The card rejects a load or install step
    fn install(&mut self, cap_file: &mut dyn Read, overwrite: bool) -> Result<(), InstallerError>;

    /// Report whether the applet is installed
    ///
    /// Absence is an answer, not an error.
    fn info(&mut self) -> Result<bool, InstallerError>;

    /// Delete the applet instance and its package
    fn delete(&mut self) -> Result<(), InstallerError>;

    /// Initialize the applet with freshly generated secrets and return them
    fn init(&mut self) -> Result<Secrets, InstallerError>;
}
