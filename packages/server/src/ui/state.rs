//! Shared application state.

use std::sync::Arc;

use crate::{
    config::ServerConfig, domain::RoomRegistry, infrastructure::registry::InMemoryRoomRegistry,
    usecase::RelayEngine,
};

/// State shared by every handler.
///
/// Built explicitly per server instance, so tests can run isolated servers
/// side by side.
pub struct AppState {
    /// Per-connection state machine driving join / relay / leave
    pub engine: RelayEngine,
    /// Room registry, shared with the engine
    pub registry: Arc<dyn RoomRegistry>,
    /// Transport settings (heartbeat, timeouts, queue sizes)
    pub config: ServerConfig,
}

impl AppState {
    /// Create state backed by a fresh in-memory registry.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_registry(config, Arc::new(InMemoryRoomRegistry::new()))
    }

    /// Create state around an existing registry.
    pub fn with_registry(config: ServerConfig, registry: Arc<dyn RoomRegistry>) -> Self {
        Self {
            engine: RelayEngine::new(registry.clone()),
            registry,
            config,
        }
    }
}
