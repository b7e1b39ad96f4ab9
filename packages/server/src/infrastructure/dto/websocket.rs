//! WebSocket message DTOs sent by the relay.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, RoomId};

/// Error text for payloads that fail validation
pub const INVALID_MESSAGE_FORMAT: &str = "Invalid message format";
/// Error text for payloads that are not the expected JSON shape
pub const MALFORMED_JSON: &str = "Malformed JSON";
/// Close reason for connections opened on anything but `/chat/{roomId}`
pub const INVALID_PATH_REASON: &str = "Invalid path. Use /chat/{roomId}";
/// Close reason when the registry refuses a join
pub const JOIN_FAILED_REASON: &str = "Failed to join room";

/// Result tag carried by every server message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Connected,
    Ok,
    Error,
}

/// Acknowledgment sent to a client once it joined its room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub status: ResponseStatus,
    pub room_id: String,
    pub server_timestamp: String,
}

impl ConnectedMessage {
    pub fn new(room: &RoomId, server_timestamp: String) -> Self {
        Self {
            status: ResponseStatus::Connected,
            room_id: room.as_str().to_string(),
            server_timestamp,
        }
    }
}

/// Envelope broadcast to every room member for an accepted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResponse {
    pub status: ResponseStatus,
    pub server_timestamp: String,
    pub data: ChatMessage,
}

impl ServerResponse {
    pub fn ok(data: ChatMessage, server_timestamp: String) -> Self {
        Self {
            status: ResponseStatus::Ok,
            server_timestamp,
            data,
        }
    }
}

/// Error reply sent to the originating client only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub status: ResponseStatus,
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            error: error.into(),
        }
    }
}
