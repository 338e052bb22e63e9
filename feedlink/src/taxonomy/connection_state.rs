//! Canonical connection states and their wire-status mapping.

use std::fmt;
use std::fmt::{Display, Formatter};

/// Connection lifecycle states, normalized across the unified and legacy
/// transport variants.
///
/// Exactly one state is current per client at any time. [`Stalled`] is a
/// modifier state: the client remembers which state it interrupted and
/// restores that state when activity resumes, rather than any fixed one.
///
/// [`Stalled`]: ConnectionState::Stalled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No session. The initial state, reached again only through the native
    /// closed callback.
    Disconnected,
    /// The server dropped the session and the native layer retries on its
    /// own.
    WillRetry,
    /// A connect command was issued; no handshake acknowledgment yet.
    Connecting,
    /// Session accepted, transport mode not yet decided.
    StreamSensing,
    WsStreaming,
    HttpStreaming,
    WsPolling,
    HttpPolling,
    /// No recent activity on an established session.
    Stalled,
}

impl ConnectionState {
    /// Every canonical state.
    pub const ALL: [ConnectionState; 9] = [
        ConnectionState::Disconnected,
        ConnectionState::WillRetry,
        ConnectionState::Connecting,
        ConnectionState::StreamSensing,
        ConnectionState::WsStreaming,
        ConnectionState::HttpStreaming,
        ConnectionState::WsPolling,
        ConnectionState::HttpPolling,
        ConnectionState::Stalled,
    ];

    /// The wire status label the native clients use for this state.
    pub fn wire_status(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "DISCONNECTED",
            ConnectionState::WillRetry => "DISCONNECTED:WILL-RETRY",
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::StreamSensing => "CONNECTED:STREAM-SENSING",
            ConnectionState::WsStreaming => "CONNECTED:WS-STREAMING",
            ConnectionState::HttpStreaming => "CONNECTED:HTTP-STREAMING",
            ConnectionState::WsPolling => "CONNECTED:WS-POLLING",
            ConnectionState::HttpPolling => "CONNECTED:HTTP-POLLING",
            ConnectionState::Stalled => "STALLED",
        }
    }

    /// Maps a native wire status label back to its canonical state.
    ///
    /// Returns `None` for labels outside the closed set; callers are
    /// expected to log and drop those rather than fail.
    pub fn from_wire_status(wire_status: &str) -> Option<ConnectionState> {
        match wire_status {
            "DISCONNECTED" => Some(ConnectionState::Disconnected),
            "DISCONNECTED:WILL-RETRY" => Some(ConnectionState::WillRetry),
            "CONNECTING" => Some(ConnectionState::Connecting),
            "CONNECTED:STREAM-SENSING" => Some(ConnectionState::StreamSensing),
            "CONNECTED:WS-STREAMING" => Some(ConnectionState::WsStreaming),
            "CONNECTED:HTTP-STREAMING" => Some(ConnectionState::HttpStreaming),
            "CONNECTED:WS-POLLING" => Some(ConnectionState::WsPolling),
            "CONNECTED:HTTP-POLLING" => Some(ConnectionState::HttpPolling),
            "STALLED" => Some(ConnectionState::Stalled),
            _ => None,
        }
    }
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_status())
    }
}
