//! UseCase: イベント取得

use std::sync::Arc;

use crate::domain::{Event, EventId, EventStore};

use super::error::GetEventError;

/// イベント取得のユースケース（自動作成はしない）
pub struct GetEventUseCase {
    event_store: Arc<dyn EventStore>,
}

impl GetEventUseCase {
    pub fn new(event_store: Arc<dyn EventStore>) -> Self {
        Self { event_store }
    }

    pub async fn execute(&self, event_id: &EventId) -> Result<Event, GetEventError> {
        self.event_store
            .find(event_id)
            .await?
            .ok_or_else(|| GetEventError::NotFound(event_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventName, repository::MockEventStore};

    #[tokio::test]
    async fn test_get_event_not_found() {
        // テスト項目: 存在しないイベントは NotFound になる
        // given (前提条件):
        let mut store = MockEventStore::new();
        store.expect_find().returning(|_| Ok(None));
        store.expect_ensure_exists().times(0);
        let usecase = GetEventUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase
            .execute(&EventId::new("missing".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(GetEventError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_get_event_found() {
        // テスト項目: 既存のイベントが返される
        // given (前提条件):
        let mut store = MockEventStore::new();
        store.expect_find().returning(|id| {
            Ok(Some(Event::new(
                id.clone(),
                EventName::new("Party".to_string()),
                42,
            )))
        });
        let usecase = GetEventUseCase::new(Arc::new(store));

        // when (操作):
        let event = usecase
            .execute(&EventId::new("E".to_string()).unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(event.name.as_str(), "Party");
        assert_eq!(event.created_at, 42);
    }
}
