//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::PathError;

/// Leading path segment every room path must carry.
pub const CHAT_PATH_SEGMENT: &str = "chat";

/// Room identifier value object.
///
/// Opaque: whatever follows `/chat/` in the connection path is used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a RoomId from an already extracted identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract the room from a connection path of the form `/chat/{roomId}`.
    ///
    /// Trailing slashes are ignored. Anything else, including an empty room
    /// segment or additional segments, is rejected.
    ///
    /// # Errors
    ///
    /// Returns `PathError` when the path does not have the expected shape
    pub fn from_path(path: &str) -> Result<Self, PathError> {
        let invalid = || PathError {
            path: path.to_string(),
        };

        let mut segments = path.trim_end_matches('/').split('/');
        let (Some(""), Some(CHAT_PATH_SEGMENT), Some(room), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(invalid());
        };

        if room.is_empty() {
            return Err(invalid());
        }
        Ok(Self(room.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection identifier value object.
///
/// Each accepted WebSocket gets a fresh UUID v4; it is the key used by the
/// room registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a new random ConnectionId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
