//! Domain layer for the relay.
//!
//! This module contains the relay's rules (room paths, message validation,
//! membership, sessions) independent of the WebSocket transport and of the
//! wire DTOs.

pub mod connection;
pub mod error;
pub mod message;
pub mod registry;
pub mod session;
pub mod validator;
pub mod value_object;

pub use connection::{Connection, OutboundFrame};
pub use error::{DeliveryError, PathError, RegistryError, ValidationError};
pub use message::{ChatMessage, MessageType};
pub use registry::{RoomRegistry, RoomSummary};
pub use session::{ConnectionEvent, Session, SessionState};
pub use validator::{validate, validate_payload};
pub use value_object::{ConnectionId, RoomId};

#[cfg(test)]
pub use registry::MockRoomRegistry;
