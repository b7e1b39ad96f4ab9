//! WebSocket connection handlers.
//!
//! Each connection runs two tasks: the reader (this handler's task) feeds
//! transport events to the relay engine one at a time, and a writer task
//! drains the connection's outbound queue into the socket and sends the
//! heartbeat pings.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{
        ConnectInfo, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    http::Uri,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior, interval_at, timeout},
};

use crate::{
    domain::{Connection, ConnectionEvent, OutboundFrame, Session},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    uri: Uri,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    tracing::debug!(%remote_addr, %path, "WebSocket upgrade requested");
    ws.on_upgrade(move |socket| handle_socket(socket, state, path, remote_addr))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, path: String, remote_addr: SocketAddr) {
    let config = &state.config;
    let (sender, mut receiver) = socket.split();

    let (connection, outbound) = Connection::with_queue(Some(remote_addr), config.outbound_buffer);
    let mut session = Session::new(Arc::new(connection));

    let mut write_task = tokio::spawn(write_outbound(
        sender,
        outbound,
        config.heartbeat_interval(),
        config.send_timeout,
    ));

    state
        .engine
        .handle(&mut session, ConnectionEvent::Open { path })
        .await;

    if session.is_closed() {
        // Rejected: give the writer a chance to deliver the close frame
        if timeout(config.send_timeout, &mut write_task).await.is_err() {
            write_task.abort();
        }
        return;
    }

    let terminal = loop {
        let next = tokio::select! {
            next = timeout(config.liveness_timeout, receiver.next()) => next,
            _ = &mut write_task => {
                tracing::debug!(connection_id = %session.connection().id(), "Writer stopped");
                break ConnectionEvent::Close;
            }
        };

        let event = match next {
            Err(_) => {
                tracing::info!(
                    connection_id = %session.connection().id(),
                    timeout_secs = config.liveness_timeout.as_secs(),
                    "Connection lost (liveness timeout)"
                );
                break ConnectionEvent::Close;
            }
            Ok(None) => break ConnectionEvent::Close,
            Ok(Some(Err(e))) => break ConnectionEvent::Error(e.to_string()),
            Ok(Some(Ok(Message::Text(text)))) => ConnectionEvent::Message(text.to_string()),
            Ok(Some(Ok(Message::Close(frame)))) => {
                tracing::debug!(
                    connection_id = %session.connection().id(),
                    ?frame,
                    "Client requested close"
                );
                break ConnectionEvent::Close;
            }
            Ok(Some(Ok(Message::Binary(_)))) => {
                tracing::debug!(connection_id = %session.connection().id(), "Ignoring binary frame");
                continue;
            }
            // Ping/pong only matter for liveness, which any frame resets
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
        };

        state.engine.handle(&mut session, event).await;
    };

    state.engine.handle(&mut session, terminal).await;
    write_task.abort();
}

/// Drain the outbound queue into the socket and ping on a fixed interval.
///
/// Stops when the queue is closed, after sending a close frame, or when a
/// write fails or takes longer than `send_timeout`.
async fn write_outbound(
    mut sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<OutboundFrame>,
    ping_interval: Duration,
    send_timeout: Duration,
) {
    let mut heartbeat = interval_at(Instant::now() + ping_interval, ping_interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let message = tokio::select! {
            frame = outbound.recv() => match frame {
                Some(OutboundFrame::Text(text)) => Message::Text(text),
                Some(OutboundFrame::Close { code, reason }) => Message::Close(Some(CloseFrame {
                    code,
                    reason: reason.into(),
                })),
                None => break,
            },
            _ = heartbeat.tick() => Message::Ping(Bytes::new()),
        };

        let closing = matches!(message, Message::Close(_));
        match timeout(send_timeout, sender.send(message)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "WebSocket write failed");
                break;
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = send_timeout.as_millis() as u64,
                    "WebSocket write timed out, dropping client"
                );
                break;
            }
        }
        if closing {
            break;
        }
    }
}
