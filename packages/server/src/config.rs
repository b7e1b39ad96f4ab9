//! Server configuration.

use std::time::Duration;

/// Default listen port
pub const DEFAULT_PORT: u16 = 9090;
/// Default interval between transport pings
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(10);
/// Default silence after which a connection is dropped
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(30);
/// Default bound on a single socket write
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);
/// Default number of frames queued per connection
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;
/// Shortest ping interval the transport will run with
pub const MIN_PING_INTERVAL: Duration = Duration::from_millis(10);

/// Runtime settings for the relay server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind (0 picks a free port)
    pub port: u16,
    /// How often the server pings each client
    pub ping_interval: Duration,
    /// How long a client may stay silent before it is disconnected
    pub liveness_timeout: Duration,
    /// Upper bound on one socket write before the client is dropped
    pub send_timeout: Duration,
    /// Frames buffered per client before broadcasts to it start failing
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            ping_interval: DEFAULT_PING_INTERVAL,
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Ping interval actually used by the transport, never below
    /// [`MIN_PING_INTERVAL`].
    pub fn heartbeat_interval(&self) -> Duration {
        self.ping_interval.max(MIN_PING_INTERVAL)
    }
}
