//! Room-based WebSocket relay server.
//!
//! Clients connect to `ws://<host>:<port>/chat/{roomId}`; every valid message
//! is broadcast to all members of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomrelay-server -- --port 9090
//! ```

use std::time::Duration;

use clap::Parser;
use roomrelay_server::ServerConfig;
use roomrelay_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(version, about = "Room-based WebSocket message relay")]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = roomrelay_server::config::DEFAULT_PORT)]
    port: u16,

    /// Seconds between heartbeat pings
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    ping_interval_secs: u64,

    /// Seconds of silence before a client is disconnected
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    liveness_timeout_secs: u64,

    /// Milliseconds allowed for a single socket write
    #[arg(long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    send_timeout_ms: u64,

    /// Frames queued per client before broadcasts to it are dropped
    #[arg(long, default_value_t = roomrelay_server::config::DEFAULT_OUTBOUND_BUFFER)]
    outbound_buffer: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            ping_interval: Duration::from_secs(args.ping_interval_secs),
            liveness_timeout: Duration::from_secs(args.liveness_timeout_secs),
            send_timeout: Duration::from_millis(args.send_timeout_ms),
            outbound_buffer: args.outbound_buffer,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = roomrelay_server::run(args.into()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
