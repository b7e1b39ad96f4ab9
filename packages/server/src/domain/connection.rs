//! One client's endpoint and its send primitive.

use std::net::SocketAddr;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::{error::DeliveryError, value_object::ConnectionId};

/// WebSocket close code for a policy violation
pub const CLOSE_POLICY_VIOLATION: u16 = 1008;
/// WebSocket close code for an unexpected server condition
pub const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// Frame queued for delivery to one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Text frame; clones share one buffer, so a broadcast encodes its payload once
    Text(Utf8Bytes),
    /// Close frame; the writer stops after sending it
    Close { code: u16, reason: String },
}

/// A connected client.
///
/// Sending never blocks: frames go into a bounded queue drained by the
/// connection's writer task.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    remote_addr: Option<SocketAddr>,
    sender: mpsc::Sender<OutboundFrame>,
}

impl Connection {
    /// Create a connection around an existing outbound queue.
    pub fn new(
        id: ConnectionId,
        remote_addr: Option<SocketAddr>,
        sender: mpsc::Sender<OutboundFrame>,
    ) -> Self {
        Self {
            id,
            remote_addr,
            sender,
        }
    }

    /// Create a connection with a fresh id and an outbound queue of `capacity` frames.
    ///
    /// The receiver is handed to whatever writes to the socket.
    pub fn with_queue(
        remote_addr: Option<SocketAddr>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<OutboundFrame>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self::new(ConnectionId::generate(), remote_addr, sender),
            receiver,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Queue a frame without waiting.
    ///
    /// # Errors
    ///
    /// * `DeliveryError::QueueFull` - the client is not keeping up
    /// * `DeliveryError::Closed` - the writer has stopped
    pub fn send(&self, frame: OutboundFrame) -> Result<(), DeliveryError> {
        self.sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::QueueFull,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Queue a text frame.
    pub fn send_text(&self, text: impl Into<Utf8Bytes>) -> Result<(), DeliveryError> {
        self.send(OutboundFrame::Text(text.into()))
    }

    /// Queue a close frame.
    pub fn close(&self, code: u16, reason: impl Into<String>) -> Result<(), DeliveryError> {
        self.send(OutboundFrame::Close {
            code,
            reason: reason.into(),
        })
    }

    /// Whether the writer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
