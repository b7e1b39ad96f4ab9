//! Room registry abstraction.
//!
//! The registry is the only shared mutable state of the relay: a
//! bidirectional mapping between rooms and their member connections.

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    connection::Connection,
    error::RegistryError,
    value_object::{ConnectionId, RoomId},
};

/// Point-in-time view of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub members: usize,
}

/// Concurrent room membership.
///
/// Implementations must keep the room→members and connection→room mappings
/// consistent under concurrent calls: a connection listed under a room is
/// mapped back to that same room, and vice versa.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Add `connection` to `room`, creating the room if needed.
    ///
    /// Joining the same room twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AlreadyInRoom` if the connection belongs to another room
    async fn join(&self, room: RoomId, connection: Arc<Connection>) -> Result<(), RegistryError>;

    /// Remove a connection from its room.
    ///
    /// Returns the room it left, or `None` if it never joined. A room left
    /// without members is dropped.
    async fn leave(&self, connection_id: ConnectionId) -> Option<RoomId>;

    /// Snapshot of the current members of `room` (empty if the room does not exist).
    async fn members_of(&self, room: &RoomId) -> Vec<Arc<Connection>>;

    /// Room the connection currently belongs to.
    async fn room_of(&self, connection_id: ConnectionId) -> Option<RoomId>;

    /// Snapshot of every room with at least one member, sorted by room id.
    async fn rooms(&self) -> Vec<RoomSummary>;
}
