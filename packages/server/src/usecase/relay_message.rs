//! UseCase: 制御メッセージの中継（MessageRouter）
//!
//! ## 何をテストしているか
//! - モバイル → キオスク、キオスク → モバイルのディスパッチ表
//! - pong と未知の type はどこにも中継されないこと
//!
//! Liveness frames are normally absorbed by the heartbeat layer before they
//! get here; the `Pong` arms only make the match exhaustive.

use std::sync::Arc;

use crate::domain::{
    ClientId, Delivery, EventId, KioskInbound, KioskMessage, MobileInbound, MobileMessage,
    SessionRegistry,
};

/// Decode a text frame sent by a phone
pub fn decode_mobile_message(text: &str) -> Result<MobileInbound, serde_json::Error> {
    serde_json::from_str(text)
}

/// Decode a text frame sent by a kiosk
pub fn decode_kiosk_message(text: &str) -> Result<KioskInbound, serde_json::Error> {
    serde_json::from_str(text)
}

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    registry: Arc<dyn SessionRegistry>,
}

impl RelayMessageUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Route a message from the phone `client_id` bound to `event_id`.
    ///
    /// Returns the delivery outcome, or `None` when nothing was sent.
    pub async fn from_mobile(
        &self,
        client_id: &ClientId,
        event_id: &EventId,
        message: MobileInbound,
    ) -> Option<Delivery> {
        let outbound = match message {
            MobileInbound::ImageSelected { image_id } => KioskMessage::ImageSelected {
                client_id: client_id.clone(),
                image_id,
            },
            MobileInbound::UploadConfirmed { image_id } => KioskMessage::UploadConfirmed {
                client_id: client_id.clone(),
                image_id,
            },
            MobileInbound::Reconnected {
                image_id,
                upload_status,
            } => KioskMessage::ClientReconnected {
                client_id: client_id.clone(),
                image_id,
                upload_status,
            },
            MobileInbound::Pong => {
                tracing::debug!("pong from client '{}'", client_id);
                return None;
            }
            MobileInbound::Unknown => {
                tracing::warn!("Ignoring unknown message type from client '{}'", client_id);
                return None;
            }
        };

        tracing::debug!("Relaying {:?} to kiosk of event '{}'", outbound, event_id);
        Some(self.registry.send_to_kiosk(event_id, outbound).await)
    }

    /// Route a message from the kiosk of `event_id`
    pub async fn from_kiosk(&self, event_id: &EventId, message: KioskInbound) -> Option<Delivery> {
        match message {
            KioskInbound::SendToMobile { client_id, content } => {
                tracing::debug!("Relaying kiosk message from event '{}' to '{}'", event_id, client_id);
                Some(
                    self.registry
                        .send_to_mobile(&client_id, MobileMessage::MessageFromKiosk { content })
                        .await,
                )
            }
            KioskInbound::Pong => None,
            KioskInbound::Unknown => {
                tracing::warn!("Ignoring unknown message type from kiosk of event '{}'", event_id);
                None
            }
        }
    }
}
