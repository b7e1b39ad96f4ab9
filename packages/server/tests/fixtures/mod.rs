//! Shared helpers for integration tests.
//!
//! Starts an in-process relay on an ephemeral port and provides small
//! WebSocket client helpers.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use roomrelay_server::{ServerConfig, serve};
use serde_json::Value;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::timeout,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, protocol::CloseFrame},
};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for a frame that should arrive
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);
/// How long to listen for a frame that should not arrive
pub const SILENCE: Duration = Duration::from_millis(300);

pub const VALID_MESSAGE: &str = r#"{"userId":"5","username":"alice","message":"hi","timestamp":"2024-01-01T00:00:00Z","messageType":"TEXT"}"#;

/// Relay server running on a background task.
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            serve(listener, config, async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Test server failed");
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Open a WebSocket on `path` without reading anything.
    pub async fn connect(&self, path: &str) -> WsClient {
        let (ws, _response) = connect_async(self.ws_url(path))
            .await
            .expect("Failed to connect WebSocket");
        ws
    }

    /// Open a WebSocket on `/chat/{room}` and consume the CONNECTED acknowledgment.
    pub async fn join(&self, room: &str) -> WsClient {
        let mut ws = self.connect(&format!("/chat/{room}")).await;
        let ack = recv_json(&mut ws).await;
        assert_eq!(ack["status"], "CONNECTED");
        assert_eq!(ack["roomId"], room);
        ws
    }

    /// `GET /api/rooms`
    pub async fn rooms(&self) -> Value {
        reqwest::get(format!("{}/api/rooms", self.base_url()))
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }

    /// Poll `/api/rooms` until it equals `expected`.
    pub async fn wait_for_rooms(&self, expected: Value) {
        let result = timeout(RECV_TIMEOUT, async {
            loop {
                if self.rooms().await == expected {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await;
        assert!(
            result.is_ok(),
            "rooms never became {expected}, last: {}",
            self.rooms().await
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Next non-control frame, or `None` on timeout / end of stream.
pub async fn next_frame(ws: &mut WsClient, wait: Duration) -> Option<Message> {
    timeout(wait, async {
        while let Some(frame) = ws.next().await {
            match frame {
                Ok(Message::Ping(_) | Message::Pong(_)) => continue,
                Ok(message) => return Some(message),
                Err(_) => return None,
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

/// Next text frame parsed as JSON; panics if none arrives.
pub async fn recv_json(ws: &mut WsClient) -> Value {
    match next_frame(ws, RECV_TIMEOUT).await {
        Some(Message::Text(text)) => serde_json::from_str(text.as_str()).expect("Invalid JSON"),
        other => panic!("expected text frame, got {other:?}"),
    }
}

/// Next frame must be a close frame.
pub async fn recv_close(ws: &mut WsClient) -> CloseFrame {
    match next_frame(ws, RECV_TIMEOUT).await {
        Some(Message::Close(Some(frame))) => frame,
        other => panic!("expected close frame, got {other:?}"),
    }
}

/// Assert that nothing arrives for a short while.
pub async fn assert_silent(ws: &mut WsClient) {
    if let Some(frame) = next_frame(ws, SILENCE).await {
        panic!("expected no frame, got {frame:?}");
    }
}

pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(Message::Text(text.to_string().into()))
        .await
        .expect("Failed to send frame");
}
