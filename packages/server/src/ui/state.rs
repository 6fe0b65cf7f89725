//! Shared application state.

use std::sync::Arc;

use crate::{
    config::HeartbeatConfig,
    usecase::{
        ConnectPeerUseCase, DisconnectPeerUseCase, GetEventUseCase, GetSessionsUseCase,
        IngestUploadUseCase, RegisterEventUseCase, RelayMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectPeerUseCase（接続のユースケース）
    pub connect_peer_usecase: Arc<ConnectPeerUseCase>,
    /// DisconnectPeerUseCase（切断のユースケース）
    pub disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// IngestUploadUseCase（アップロードのユースケース）
    pub ingest_upload_usecase: Arc<IngestUploadUseCase>,
    /// RegisterEventUseCase（イベント登録のユースケース）
    pub register_event_usecase: Arc<RegisterEventUseCase>,
    /// GetEventUseCase（イベント取得のユースケース）
    pub get_event_usecase: Arc<GetEventUseCase>,
    /// GetSessionsUseCase（接続一覧取得のユースケース）
    pub get_sessions_usecase: Arc<GetSessionsUseCase>,
    pub heartbeat: HeartbeatConfig,
}
