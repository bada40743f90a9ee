//! Execute command use case
//!
//! This use case orchestrates a complete run:
//! 1. Open a card session on the only connected reader
//! 2. Hand the connection to the command
//! 3. Close the session, whatever the command returned

use std::io::Write;

use tracing::warn;

use super::{dispatch, CardSession};
use crate::adapters::CardInstaller;
use crate::error::AppletResult;
use crate::model::Command;
use crate::ports::{ConnectionOf, ReaderSubsystem};

/// Run `work` against the card of the only connected reader.
///
/// The result is the one `work` returned. Teardown failures are logged and
/// never change it.
pub fn run_session<S, T, F>(subsystem: &S, work: F) -> AppletResult<T>
where
    S: ReaderSubsystem,
    F: FnOnce(&ConnectionOf<S>) -> AppletResult<T>,
{
    let mut session = CardSession::open(subsystem)?;

    session.mark_dispatched();
    let outcome = work(session.connection());

    let teardown = session.close();
    if !teardown.is_clean() {
        warn!(
            failures = teardown.failures().len(),
            "card session was not released cleanly"
        );
    }

    outcome
}

/// Execute `command` on the card with the APDU installer, reporting to `out`
pub fn execute_command<S, W>(subsystem: &S, command: &Command, out: &mut W) -> AppletResult<()>
where
    S: ReaderSubsystem,
    W: Write + ?Sized,
{
    run_session(subsystem, |connection| {
        let mut installer = CardInstaller::new(connection);
        dispatch(command, &mut installer, out)
    })
}
