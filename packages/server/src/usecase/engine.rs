//! Relay Engine: per-connection state machine.
//!
//! Every transport event for a connection goes through [`RelayEngine::handle`],
//! which switches on the event and the session state:
//!
//! ```text
//! Connecting --Open(valid path)--> Joined --Close/Error--> Closed
//!     |                              |
//!     +--Open(bad path)--> Closed    +--Message--> Joined (relay or error reply)
//! ```
//!
//! Events that do not apply to the current state, and every event after
//! `Closed`, are ignored.

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionEvent, RoomId, RoomRegistry, Session, SessionState,
        connection::{CLOSE_INTERNAL_ERROR, CLOSE_POLICY_VIOLATION},
    },
    infrastructure::dto::websocket::{
        ErrorMessage, INVALID_MESSAGE_FORMAT, INVALID_PATH_REASON, JOIN_FAILED_REASON,
        MALFORMED_JSON,
    },
};

use super::{
    error::{JoinError, RelayError},
    join_room::JoinRoomUseCase,
    leave_room::LeaveRoomUseCase,
    relay_message::{BroadcastReport, RelayMessageUseCase},
};

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The connection joined a room and was acknowledged
    Joined(RoomId),
    /// The connection was closed without joining
    Rejected,
    /// The message was broadcast to the room
    Relayed(BroadcastReport),
    /// The message was refused; the sender got an error envelope with this text
    Replied(&'static str),
    /// The session closed, leaving the given room if it had one
    Left(Option<RoomId>),
    /// The event does not apply to the session's state
    Ignored,
}

/// Orchestrates join / relay / leave for every connection.
pub struct RelayEngine {
    join_room: JoinRoomUseCase,
    relay_message: RelayMessageUseCase,
    leave_room: LeaveRoomUseCase,
}

impl RelayEngine {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self {
            join_room: JoinRoomUseCase::new(registry.clone()),
            relay_message: RelayMessageUseCase::new(registry.clone()),
            leave_room: LeaveRoomUseCase::new(registry),
        }
    }

    /// Apply one transport event to a session.
    pub async fn handle(&self, session: &mut Session, event: ConnectionEvent) -> EventOutcome {
        let state = session.state().clone();
        match (state, event) {
            (SessionState::Closed, event) => {
                tracing::debug!(
                    connection_id = %session.connection().id(),
                    ?event,
                    "Ignoring event for closed session"
                );
                EventOutcome::Ignored
            }
            (SessionState::Connecting, ConnectionEvent::Open { path }) => {
                self.open(session, &path).await
            }
            (SessionState::Joined(room), ConnectionEvent::Message(text)) => {
                self.message(session, &room, &text).await
            }
            (_, ConnectionEvent::Close) => self.close(session).await,
            (_, ConnectionEvent::Error(reason)) => {
                tracing::error!(
                    connection_id = %session.connection().id(),
                    %reason,
                    "Transport error, closing connection"
                );
                self.close(session).await
            }
            (state, event) => {
                tracing::debug!(
                    connection_id = %session.connection().id(),
                    ?state,
                    ?event,
                    "Ignoring event"
                );
                EventOutcome::Ignored
            }
        }
    }

    async fn open(&self, session: &mut Session, path: &str) -> EventOutcome {
        let connection = Arc::clone(session.connection());
        match self.join_room.execute(path, Arc::clone(&connection)).await {
            Ok(room) => {
                tracing::info!(
                    connection_id = %connection.id(),
                    remote_addr = ?connection.remote_addr(),
                    %room,
                    "Client joined room"
                );
                session.mark_joined(room.clone());
                EventOutcome::Joined(room)
            }
            Err(e) => {
                let (code, reason) = match &e {
                    JoinError::InvalidPath(_) => (CLOSE_POLICY_VIOLATION, INVALID_PATH_REASON),
                    JoinError::Registry(_) | JoinError::Encode(_) => {
                        (CLOSE_INTERNAL_ERROR, JOIN_FAILED_REASON)
                    }
                };
                tracing::warn!(
                    connection_id = %connection.id(),
                    remote_addr = ?connection.remote_addr(),
                    error = %e,
                    "Rejecting connection"
                );
                if let Err(e) = connection.close(code, reason) {
                    tracing::debug!(connection_id = %connection.id(), error = %e, "Failed to queue close frame");
                }
                session.mark_closed();
                EventOutcome::Rejected
            }
        }
    }

    async fn message(&self, session: &Session, room: &RoomId, text: &str) -> EventOutcome {
        let connection = session.connection();
        tracing::debug!(connection_id = %connection.id(), %room, "Received message");

        let reply = match self.relay_message.execute(room, text).await {
            Ok(report) => return EventOutcome::Relayed(report),
            Err(RelayError::Malformed(e)) => {
                tracing::warn!(connection_id = %connection.id(), error = %e, "Malformed message");
                MALFORMED_JSON
            }
            Err(RelayError::Invalid(e)) => {
                tracing::warn!(connection_id = %connection.id(), reason = %e, "Invalid message");
                INVALID_MESSAGE_FORMAT
            }
            Err(e @ RelayError::Encode(_)) => {
                tracing::error!(connection_id = %connection.id(), error = %e, "Failed to encode response");
                return EventOutcome::Ignored;
            }
        };

        match serde_json::to_string(&ErrorMessage::new(reply)) {
            Ok(json) => {
                if let Err(e) = connection.send_text(json) {
                    tracing::warn!(connection_id = %connection.id(), error = %e, "Failed to send error reply");
                }
            }
            Err(e) => {
                tracing::error!(connection_id = %connection.id(), error = %e, "Failed to encode error reply");
            }
        }
        EventOutcome::Replied(reply)
    }

    async fn close(&self, session: &mut Session) -> EventOutcome {
        let room = self.leave_room.execute(session.connection().id()).await;
        session.mark_closed();
        EventOutcome::Left(room)
    }
}
