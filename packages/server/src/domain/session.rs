//! Per-connection session state.

use std::sync::Arc;

use super::{connection::Connection, value_object::RoomId};

/// Lifecycle of one connection: `Connecting → Joined → Closed`.
///
/// There is no re-join; once `Closed`, a session stays closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Joined(RoomId),
    Closed,
}

/// Events delivered by the transport for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Handshake accepted for the given request path
    Open { path: String },
    /// Text frame received
    Message(String),
    /// Peer closed, liveness timed out, or the writer stopped
    Close,
    /// Transport error; treated as closing
    Error(String),
}

/// A connection together with its state.
#[derive(Debug)]
pub struct Session {
    connection: Arc<Connection>,
    state: SessionState,
}

impl Session {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            connection,
            state: SessionState::Connecting,
        }
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Room this session joined, if it is currently joined.
    pub fn room(&self) -> Option<&RoomId> {
        match &self.state {
            SessionState::Joined(room) => Some(room),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    pub(crate) fn mark_joined(&mut self, room: RoomId) {
        self.state = SessionState::Joined(room);
    }

    pub(crate) fn mark_closed(&mut self) {
        self.state = SessionState::Closed;
    }
}
