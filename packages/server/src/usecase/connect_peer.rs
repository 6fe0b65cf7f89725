//! UseCase: キオスク・モバイルの接続処理
//!
//! Connecting lazily creates the event namespace, then registers the handle.
//! The registry takes care of superseding and evicting older connections.

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionHandle, EventId, EventStore, SessionRegistry};

use super::error::ConnectError;

/// 接続のユースケース
pub struct ConnectPeerUseCase {
    event_store: Arc<dyn EventStore>,
    registry: Arc<dyn SessionRegistry>,
}

impl ConnectPeerUseCase {
    pub fn new(event_store: Arc<dyn EventStore>, registry: Arc<dyn SessionRegistry>) -> Self {
        Self {
            event_store,
            registry,
        }
    }

    /// キオスクを接続する（同じイベントの古いキオスクは閉じられる）
    pub async fn connect_kiosk(
        &self,
        event_id: EventId,
        handle: ConnectionHandle,
    ) -> Result<(), ConnectError> {
        self.event_store.ensure_exists(&event_id).await?;
        self.registry.connect_kiosk(event_id, handle).await;
        Ok(())
    }

    /// モバイルを接続する（同じクライアント・同じイベントの古い接続は追い出される）
    pub async fn connect_mobile(
        &self,
        client_id: ClientId,
        event_id: EventId,
        handle: ConnectionHandle,
    ) -> Result<(), ConnectError> {
        self.event_store.ensure_exists(&event_id).await?;
        self.registry.connect_mobile(client_id, event_id, handle).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Event, EventName, StorageError, repository::MockEventStore, session::MockSessionRegistry,
    };
    use mockall::predicate::eq;
    use tokio::sync::mpsc;

    fn event_id(value: &str) -> EventId {
        EventId::new(value.to_string()).unwrap()
    }

    fn store_that_creates() -> MockEventStore {
        let mut store = MockEventStore::new();
        store
            .expect_ensure_exists()
            .returning(|id| Ok(Event::new(id.clone(), EventName::auto_generated(), 0)));
        store
    }

    #[tokio::test]
    async fn test_connect_kiosk_creates_event_and_registers() {
        // テスト項目: キオスク接続でイベントが作成され、レジストリに登録される
        // given (前提条件):
        let mut registry = MockSessionRegistry::new();
        registry
            .expect_connect_kiosk()
            .with(eq(event_id("E")), mockall::predicate::always())
            .times(1)
            .return_const(());
        let usecase = ConnectPeerUseCase::new(Arc::new(store_that_creates()), Arc::new(registry));
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase
            .connect_kiosk(event_id("E"), ConnectionHandle::new(tx))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_connect_mobile_registers_with_event() {
        // テスト項目: モバイル接続がクライアント ID とイベント ID 付きで登録される
        // given (前提条件):
        let mut registry = MockSessionRegistry::new();
        registry
            .expect_connect_mobile()
            .withf(|client_id, event_id, _| client_id.as_str() == "c1" && event_id.as_str() == "E")
            .times(1)
            .return_const(());
        let usecase = ConnectPeerUseCase::new(Arc::new(store_that_creates()), Arc::new(registry));
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase
            .connect_mobile(
                ClientId::new("c1".to_string()).unwrap(),
                event_id("E"),
                ConnectionHandle::new(tx),
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_storage_failure_skips_registration() {
        // テスト項目: イベント作成に失敗した場合はレジストリに登録しない
        // given (前提条件):
        let mut store = MockEventStore::new();
        store.expect_ensure_exists().returning(|_| {
            Err(StorageError::Io {
                path: "/data/E".to_string(),
                source: std::io::Error::other("read-only file system"),
            })
        });
        let mut registry = MockSessionRegistry::new();
        registry.expect_connect_kiosk().times(0);
        let usecase = ConnectPeerUseCase::new(Arc::new(store), Arc::new(registry));
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase
            .connect_kiosk(event_id("E"), ConnectionHandle::new(tx))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(ConnectError::Storage(_))));
    }
}
