//! UseCase: 接続状況の取得（デバッグ用）

use std::sync::Arc;

use crate::domain::{SessionRegistry, SessionSnapshot};

pub struct GetSessionsUseCase {
    registry: Arc<dyn SessionRegistry>,
}

impl GetSessionsUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> SessionSnapshot {
        self.registry.snapshot().await
    }
}
