use std::fmt;

/// Lifecycle of one run, from startup to released hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionState {
    Uninitialized,
    ContextEstablished,
    ReaderSelected,
    Connected,
    ProtocolKnown,
    CommandDispatched,
    Released,
}

impl SessionState {
    /// State reached on the success path, `None` once released
    pub fn next(self) -> Option<Self> {
        match self {
            SessionState::Uninitialized => Some(SessionState::ContextEstablished),
            SessionState::ContextEstablished => Some(SessionState::ReaderSelected),
            SessionState::ReaderSelected => Some(SessionState::Connected),
            SessionState::Connected => Some(SessionState::ProtocolKnown),
            SessionState::ProtocolKnown => Some(SessionState::CommandDispatched),
            SessionState::CommandDispatched => Some(SessionState::Released),
            SessionState::Released => None,
        }
    }

    /// Every state may fall through to `Released`; otherwise only forward steps are legal
    pub fn can_transition_to(self, to: SessionState) -> bool {
        (to == SessionState::Released && self != SessionState::Released) || self.next() == Some(to)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::ContextEstablished => "context-established",
            SessionState::ReaderSelected => "reader-selected",
            SessionState::Connected => "connected",
            SessionState::ProtocolKnown => "protocol-known",
            SessionState::CommandDispatched => "command-dispatched",
            SessionState::Released => "released",
        };
        f.write_str(name)
    }
}
