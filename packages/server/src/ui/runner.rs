//! Server startup and serving.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;

use crate::{config::ServerConfig, error::ServerError};

use super::{router::build_router, signal::shutdown_signal, state::AppState};

/// Bind the configured address and serve until Ctrl+C / SIGTERM.
///
/// # Errors
///
/// Returns `ServerError` if the address cannot be bound or the accept loop fails
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    let local_addr = listener.local_addr()?;
    tracing::info!("WebSocket listening on ws://{}/chat/{{roomId}}", local_addr);
    tracing::info!("Health endpoint available at http://{}/health", local_addr);

    serve(listener, config, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns `ServerError::Serve` if the accept loop fails
pub async fn serve<F>(listener: TcpListener, config: ServerConfig, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    Ok(())
}
