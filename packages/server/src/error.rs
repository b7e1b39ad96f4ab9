//! Server startup errors.

use thiserror::Error;

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
