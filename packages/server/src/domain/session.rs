//! Connection handles and the session registry interface.
//!
//! A `ConnectionHandle` is the write side of one accepted WebSocket: frames
//! pushed into it are drained by that connection's outbound loop. Pushing
//! never blocks, so registry operations can push while holding their lock.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

use super::{ClientId, ConnectionId, EventId, KioskMessage, MobileMessage, PushError};

/// Frame queued for a connection's outbound loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushFrame {
    Text(String),
    /// Ask the outbound loop to send a close frame and stop
    Close,
}

/// Sender half feeding a connection's outbound loop
pub type PusherChannel = mpsc::UnboundedSender<PushFrame>;

/// Write side of one accepted connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: PusherChannel,
}

impl ConnectionHandle {
    pub fn new(sender: PusherChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Serialize `message` and queue it as a text frame
    pub fn push<T: Serialize>(&self, message: &T) -> Result<(), PushError> {
        let text =
            serde_json::to_string(message).map_err(|e| PushError::Encode(e.to_string()))?;
        self.sender
            .send(PushFrame::Text(text))
            .map_err(|_| PushError::Closed(self.id.to_string()))
    }

    /// Ask the connection to close. Errors are ignored: a handle whose loop
    /// already stopped is closed anyway.
    pub fn close(&self) {
        let _ = self.sender.send(PushFrame::Close);
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Outcome of a single best-effort send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Nobody is registered under the target key; nothing was attempted
    NoPeer,
    /// The push failed and the peer has been disconnected
    Failed,
}

/// Read-only view of the registry, sorted for stable output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub kiosks: Vec<EventId>,
    pub mobiles: Vec<(ClientId, EventId)>,
}

/// Live kiosk and mobile connections.
///
/// Invariants held by every implementation:
/// - at most one kiosk per event
/// - at most one mobile connection per client
/// - at most one mobile connection per event (a newer one evicts the rest)
///
/// Sends are single attempts. A failed send disconnects the peer exactly as if
/// it had hung up; the error never reaches whoever triggered the send.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Register the kiosk for `event_id`, closing any kiosk it supersedes
    async fn connect_kiosk(&self, event_id: EventId, handle: ConnectionHandle);

    /// Register a phone, evicting the previous connection of the same client
    /// and every other phone bound to the same event
    async fn connect_mobile(&self, client_id: ClientId, event_id: EventId, handle: ConnectionHandle);

    async fn disconnect_kiosk(&self, event_id: &EventId);

    /// Remove the phone and tell its kiosk, if any, that it left
    async fn disconnect_mobile(&self, client_id: &ClientId);

    /// Disconnect the kiosk only if `connection_id` is still the registered
    /// one. Returns whether anything was removed.
    async fn release_kiosk(&self, event_id: &EventId, connection_id: ConnectionId) -> bool;

    /// Disconnect the phone only if `connection_id` is still the registered
    /// one. Returns whether anything was removed.
    async fn release_mobile(&self, client_id: &ClientId, connection_id: ConnectionId) -> bool;

    async fn send_to_kiosk(&self, event_id: &EventId, message: KioskMessage) -> Delivery;

    async fn send_to_mobile(&self, client_id: &ClientId, message: MobileMessage) -> Delivery;

    async fn snapshot(&self) -> SessionSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_serializes_message() {
        // テスト項目: push でメッセージが JSON テキストフレームとしてキューに入る
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(tx);

        // when (操作):
        let result = handle.push(&KioskMessage::Ping);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.try_recv().unwrap(),
            PushFrame::Text(r#"{"type":"ping"}"#.to_string())
        );
    }

    #[test]
    fn test_push_fails_after_receiver_dropped() {
        // テスト項目: 送信ループ停止後の push は Closed エラーになる
        // given (前提条件):
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(tx);
        drop(rx);

        // when (操作):
        let result = handle.push(&MobileMessage::Ping);

        // then (期待する結果):
        assert!(matches!(result, Err(PushError::Closed(_))));
        assert!(handle.is_closed());
    }

    #[test]
    fn test_close_is_best_effort() {
        // テスト項目: close は受信側が無くてもパニックしない
        // given (前提条件):
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(tx);
        drop(rx);

        // when (操作):
        handle.close();
        handle.close();

        // then (期待する結果):
        assert!(handle.is_closed());
    }

    #[test]
    fn test_cloned_handles_share_identity() {
        // テスト項目: クローンしたハンドルは同じ ConnectionId を持つ
        // given (前提条件):
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(tx.clone());
        let other = ConnectionHandle::new(tx);

        // when (操作):
        let cloned = handle.clone();

        // then (期待する結果):
        assert_eq!(cloned.id(), handle.id());
        assert_ne!(other.id(), handle.id());
    }
}
