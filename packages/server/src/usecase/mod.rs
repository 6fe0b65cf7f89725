//! UseCase 層
//!
//! Each use case owns one operation of the broker and depends only on the
//! domain interfaces (`EventStore`, `SessionRegistry`).

mod connect_peer;
mod disconnect_peer;
mod error;
mod get_event;
mod get_sessions;
mod ingest_upload;
mod register_event;
mod relay_message;

pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
pub use error::{ConnectError, GetEventError, IngestError, RegisterEventError};
pub use get_event::GetEventUseCase;
pub use get_sessions::GetSessionsUseCase;
pub use ingest_upload::{IMAGE_URL_PREFIX, IngestReceipt, IngestUploadUseCase};
pub use register_event::{RegisterEventUseCase, RegisteredEvent};
pub use relay_message::{RelayMessageUseCase, decode_kiosk_message, decode_mobile_message};
