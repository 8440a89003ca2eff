//! Session lifecycle states.

use std::fmt;

/// Where a session is in its lifecycle.
///
/// ```text
/// Disconnected -> Connecting -> Registering -> Active -> Disconnected
///                      \______ (hijack) ______/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No socket. Initial and terminal state.
    #[default]
    Disconnected,
    /// Dialing, or adopting a socket from a previous instance.
    Connecting,
    /// Registration lines queued, waiting for the server's first numeric.
    Registering,
    /// Registered, or resumed on an adopted socket.
    Active,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        self == SessionState::Active
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Registering => "registering",
            SessionState::Active => "active",
        };
        f.write_str(name)
    }
}
