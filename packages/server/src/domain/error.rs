//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::RoomId;

/// The connection path does not have the `/chat/{roomId}` shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid path '{path}'. Use /chat/{{roomId}}")]
pub struct PathError {
    pub path: String,
}

/// Reasons an inbound chat message is rejected.
///
/// The client is only told "Invalid message format"; the variant is kept for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload decoded to JSON `null`
    #[error("message payload is missing")]
    MissingPayload,

    /// A required field was absent or null
    #[error("field '{0}' is missing")]
    MissingField(&'static str),

    /// userId is not a base-10 integer
    #[error("userId must be numeric (got: {0})")]
    UserIdNotNumeric(String),

    /// userId is outside the accepted range
    #[error("userId must be between {min} and {max} (got {actual})")]
    UserIdOutOfRange { min: i64, max: i64, actual: i64 },

    /// username length is outside the accepted range
    #[error("username must be {min}-{max} characters (got {actual})")]
    UsernameLength { min: usize, max: usize, actual: usize },

    /// username contains something other than ASCII letters and digits
    #[error("username must be alphanumeric")]
    UsernameCharacters,

    /// message length is outside the accepted range
    #[error("message must be {min}-{max} characters (got {actual})")]
    MessageLength { min: usize, max: usize, actual: usize },

    /// timestamp is not an ISO-8601 instant
    #[error("timestamp must be ISO-8601 (got: {0})")]
    TimestampFormat(String),

    /// messageType is not one of the known tags
    #[error("messageType must be TEXT, JOIN or LEAVE (got: {0})")]
    UnknownMessageType(String),
}

/// Failure to enqueue an outbound frame for one connection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection's outbound queue is full (slow reader)
    #[error("outbound queue is full")]
    QueueFull,

    /// The connection's writer has gone away
    #[error("connection is closed")]
    Closed,
}

/// Errors related to room membership
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A connection tried to join a second room
    #[error("connection already belongs to room '{current}'")]
    AlreadyInRoom { current: RoomId },
}
