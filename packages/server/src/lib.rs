//! Room-based WebSocket message relay.
//!
//! Clients connect to `/chat/{roomId}`, and every valid message they send is
//! broadcast to all members of that room, the sender included.
//!
//! Layers:
//! - [`domain`]: room paths, message validation, connections, sessions and the registry trait
//! - [`infrastructure`]: in-memory registry and wire DTOs
//! - [`usecase`]: join / relay / leave and the per-connection [`usecase::RelayEngine`]
//! - [`ui`]: axum router, WebSocket transport and HTTP endpoints

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{run, serve};
