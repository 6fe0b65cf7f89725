//! UseCase: 切断処理
//!
//! Called once a connection's tasks have stopped. Only the connection that is
//! still registered is removed; one that was already superseded or evicted
//! has nothing left to clean up.

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionId, EventId, SessionRegistry};

/// 切断のユースケース
pub struct DisconnectPeerUseCase {
    registry: Arc<dyn SessionRegistry>,
}

impl DisconnectPeerUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn kiosk_left(&self, event_id: &EventId, connection_id: ConnectionId) {
        if self.registry.release_kiosk(event_id, connection_id).await {
            tracing::info!("Kiosk for event '{}' disconnected", event_id);
        } else {
            tracing::debug!(
                "Kiosk connection {} for event '{}' was already replaced",
                connection_id,
                event_id
            );
        }
    }

    pub async fn mobile_left(&self, client_id: &ClientId, connection_id: ConnectionId) {
        if self.registry.release_mobile(client_id, connection_id).await {
            tracing::info!("Client '{}' disconnected", client_id);
        } else {
            tracing::debug!(
                "Connection {} of client '{}' was already replaced or evicted",
                connection_id,
                client_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionHandle, PushFrame},
        infrastructure::session::InMemorySessionRegistry,
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_evicted_connection_does_not_notify_twice() {
        // テスト項目: 追い出された接続の切断処理では client_disconnected が重複しない
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let event_id = EventId::new("E".to_string()).unwrap();
        let (kiosk_tx, mut kiosk_rx) = mpsc::unbounded_channel();
        registry
            .connect_kiosk(event_id.clone(), ConnectionHandle::new(kiosk_tx))
            .await;
        let (a_tx, _a_rx) = mpsc::unbounded_channel();
        let a = ConnectionHandle::new(a_tx);
        let a_id = a.id();
        let client_a = ClientId::new("A".to_string()).unwrap();
        registry
            .connect_mobile(client_a.clone(), event_id.clone(), a)
            .await;
        let (b_tx, _b_rx) = mpsc::unbounded_channel();
        registry
            .connect_mobile(
                ClientId::new("B".to_string()).unwrap(),
                event_id.clone(),
                ConnectionHandle::new(b_tx),
            )
            .await;
        let usecase = DisconnectPeerUseCase::new(registry.clone());

        // when (操作): 追い出された A のタスクが終了する
        usecase.mobile_left(&client_a, a_id).await;

        // then (期待する結果):
        let mut disconnected = 0;
        while let Ok(PushFrame::Text(text)) = kiosk_rx.try_recv() {
            if text.contains("client_disconnected") {
                disconnected += 1;
            }
        }
        assert_eq!(disconnected, 1);
        assert_eq!(registry.snapshot().await.mobiles.len(), 1);
    }
}
