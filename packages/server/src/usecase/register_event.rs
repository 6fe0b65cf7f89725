//! UseCase: イベント登録

use std::sync::Arc;

use crate::domain::{Event, EventName, EventStore};

use super::error::RegisterEventError;

/// A freshly registered event and the URL its QR code should encode
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredEvent {
    pub event: Event,
    pub qr_url: String,
}

/// イベント登録のユースケース
pub struct RegisterEventUseCase {
    event_store: Arc<dyn EventStore>,
    /// Public base URL of the phone-facing page, without trailing slash
    public_url: String,
}

impl RegisterEventUseCase {
    pub fn new(event_store: Arc<dyn EventStore>, public_url: impl Into<String>) -> Self {
        Self {
            event_store,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// イベント登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(RegisteredEvent)` - 作成されたイベントと QR コード用 URL
    /// * `Err(RegisterEventError)` - ストレージ障害
    ///
    /// The name is stored exactly as given; blank names are accepted.
    pub async fn execute(&self, event_name: String) -> Result<RegisteredEvent, RegisterEventError> {
        let name = EventName::new(event_name);
        let event = self.event_store.register(name).await?;
        let qr_url = format!("{}/event/{}", self.public_url, event.id);
        tracing::info!("Registered event '{}' -> {}", event.id, qr_url);
        Ok(RegisteredEvent { event, qr_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventId, StorageError, repository::MockEventStore};

    #[tokio::test]
    async fn test_register_event_builds_qr_url() {
        // テスト項目: 登録したイベントの ID を含む QR URL が生成される
        // given (前提条件):
        let mut store = MockEventStore::new();
        store.expect_register().times(1).returning(|name| {
            Ok(Event::new(EventId::new("E".to_string()).unwrap(), name, 0))
        });
        let usecase = RegisterEventUseCase::new(Arc::new(store), "https://kiosk.example.com/");

        // when (操作):
        let result = usecase.execute("Birthday".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(result.qr_url, "https://kiosk.example.com/event/E");
        assert_eq!(result.event.name.as_str(), "Birthday");
    }

    #[tokio::test]
    async fn test_register_event_accepts_blank_name_as_is() {
        // テスト項目: 空白のみのイベント名もそのまま登録される
        // given (前提条件):
        let mut store = MockEventStore::new();
        store
            .expect_register()
            .withf(|name| name.as_str() == "  ")
            .times(1)
            .returning(|name| Ok(Event::new(EventId::new("E".to_string()).unwrap(), name, 0)));
        let usecase = RegisterEventUseCase::new(Arc::new(store), "http://localhost:8080");

        // when (操作):
        let result = usecase.execute("  ".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(result.event.name.as_str(), "  ");
        assert_eq!(result.qr_url, "http://localhost:8080/event/E");
    }

    #[tokio::test]
    async fn test_register_event_propagates_storage_error() {
        // テスト項目: ストレージ障害は Storage エラーとして返される
        // given (前提条件):
        let mut store = MockEventStore::new();
        store.expect_register().returning(|_| {
            Err(StorageError::Io {
                path: "/data".to_string(),
                source: std::io::Error::other("disk full"),
            })
        });
        let usecase = RegisterEventUseCase::new(Arc::new(store), "http://localhost:8080");

        // when (操作):
        let result = usecase.execute("Party".to_string()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegisterEventError::Storage(_))));
    }
}
