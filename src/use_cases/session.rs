//! Card session use case
//!
//! A `CardSession` owns the reader context and the card connection for one
//! run. Both are held in release guards: whatever path leaves the session
//! (normal close, early `?` return, panic), the connection is disconnected
//! first and the context released second, each exactly once.

use tracing::{debug, error, trace, warn};

use crate::error::{AppletResult, TeardownError};
use crate::logic::select_single_reader;
use crate::model::{Protocol, ReaderId, SessionState};
use crate::ports::{CardConnection, ReaderContext, ReaderSubsystem};

/// Owns a resource and releases it once, explicitly or on drop
struct ReleaseGuard<T> {
    resource: T,
    release: fn(&mut T) -> Result<(), TeardownError>,
    released: bool,
}

impl<T> ReleaseGuard<T> {
    fn new(resource: T, release: fn(&mut T) -> Result<(), TeardownError>) -> Self {
        Self {
            resource,
            release,
            released: false,
        }
    }

    fn get(&self) -> &T {
        &self.resource
    }

    /// Attempt the release. Later calls, including the one from `drop`, do nothing.
    fn release(&mut self) -> Result<(), TeardownError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        (self.release)(&mut self.resource)
    }
}

impl<T> Drop for ReleaseGuard<T> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            error!(error = %e, "teardown failed");
        }
    }
}

/// Release failures collected while closing a session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    failures: Vec<TeardownError>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[TeardownError] {
        &self.failures
    }

    fn record(&mut self, result: Result<(), TeardownError>) {
        if let Err(e) = result {
            error!(error = %e, "teardown failed");
            self.failures.push(e);
        }
    }
}

/// Live connection to the single reader's card, nested in its context
pub struct CardSession<C: ReaderContext> {
    // Declared before `context`: fields drop in order, so an unclosed session
    // still disconnects before releasing the context.
    connection: ReleaseGuard<C::Connection>,
    context: ReleaseGuard<C>,
    reader: ReaderId,
    protocol: Protocol,
    state: SessionState,
}

impl<C: ReaderContext> CardSession<C> {
    /// Establish the context, select the only reader, connect and read the protocol.
    ///
    /// Any acquisition failure is returned before a command can run. Resources
    /// acquired up to that point are released on the way out.
    pub fn open<S>(subsystem: &S) -> AppletResult<Self>
    where
        S: ReaderSubsystem<Context = C>,
    {
        let mut state = SessionState::Uninitialized;

        let context = ReleaseGuard::new(subsystem.establish()?, C::release);
        advance(&mut state, SessionState::ContextEstablished);

        let reader = select_single_reader(context.get().list_readers()?)?;
        debug!(reader = %reader, "using reader");
        advance(&mut state, SessionState::ReaderSelected);

        debug!(reader = %reader, "connecting to card");
        let connection = ReleaseGuard::new(
            context.get().connect(&reader)?,
            <C::Connection as CardConnection>::disconnect,
        );
        advance(&mut state, SessionState::Connected);

        let protocol = match connection.get().active_protocol() {
            Ok(protocol) => protocol,
            Err(e) => {
                warn!(error = %e, "could not read card protocol");
                Protocol::Unknown
            }
        };
        debug!(protocol = %protocol, "card protocol");
        advance(&mut state, SessionState::ProtocolKnown);

        Ok(Self {
            connection,
            context,
            reader,
            protocol,
            state,
        })
    }

    pub fn connection(&self) -> &C::Connection {
        self.connection.get()
    }

    pub fn reader(&self) -> &ReaderId {
        &self.reader
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Record that the command has been handed the connection
    pub fn mark_dispatched(&mut self) {
        advance(&mut self.state, SessionState::CommandDispatched);
    }

    /// Disconnect the card, then release the context.
    ///
    /// The context release is attempted even when the disconnect failed.
    pub fn close(mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        report.record(self.connection.release());
        report.record(self.context.release());
        advance(&mut self.state, SessionState::Released);
        report
    }
}

fn advance(state: &mut SessionState, to: SessionState) {
    debug_assert!(state.can_transition_to(to), "{} -> {}", state, to);
    trace!(from = %state, to = %to, "session state");
    *state = to;
}
