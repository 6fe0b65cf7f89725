//! UseCase: 画像アップロードの受け渡し（UploadIngestor）
//!
//! The response depends only on storing the file. Notifying the kiosk and the
//! uploading phone happens afterwards, one attempt each, and its outcome is
//! only logged.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    domain::{ClientId, Delivery, EventId, EventStore, KioskMessage, MobileMessage, SessionRegistry},
    infrastructure::image::{ImageProcessingError, normalize_upload, normalizer::STORED_EXTENSION},
};

use super::error::IngestError;

/// URL prefix under which stored images are served
pub const IMAGE_URL_PREFIX: &str = "/images";

/// Stored file and its public URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub filename: String,
    pub image_url: String,
}

/// アップロードのユースケース
pub struct IngestUploadUseCase {
    event_store: Arc<dyn EventStore>,
    registry: Arc<dyn SessionRegistry>,
}

impl IngestUploadUseCase {
    pub fn new(event_store: Arc<dyn EventStore>, registry: Arc<dyn SessionRegistry>) -> Self {
        Self {
            event_store,
            registry,
        }
    }

    pub async fn execute(
        &self,
        event_id: EventId,
        client_id: ClientId,
        bytes: Vec<u8>,
    ) -> Result<IngestReceipt, IngestError> {
        self.event_store.ensure_exists(&event_id).await?;

        let normalized = tokio::task::spawn_blocking(move || normalize_upload(&bytes))
            .await
            .map_err(|e| IngestError::Processing(e.to_string()))?
            .map_err(|e| match e {
                ImageProcessingError::Decode(reason) => IngestError::Decode(reason),
                ImageProcessingError::Encode(reason) => IngestError::Processing(reason),
            })?;

        let filename = format!("{}.{}", Uuid::new_v4().simple(), STORED_EXTENSION);
        let stored = self
            .event_store
            .save_image(&event_id, &filename, &normalized.jpeg)
            .await?;
        tracing::info!(
            "Stored upload from client '{}' as {}/{} ({}x{}, {} bytes)",
            client_id,
            event_id,
            stored.filename,
            normalized.width,
            normalized.height,
            stored.size_bytes
        );

        let image_url = format!("{}/{}/{}", IMAGE_URL_PREFIX, event_id, stored.filename);

        // Fire-and-forget: one attempt per peer, no retry and no queue.
        self.notify(&event_id, &client_id, &image_url).await;

        Ok(IngestReceipt {
            filename: stored.filename,
            image_url,
        })
    }

    async fn notify(&self, event_id: &EventId, client_id: &ClientId, image_url: &str) {
        let kiosk = self
            .registry
            .send_to_kiosk(
                event_id,
                KioskMessage::ImageUploaded {
                    client_id: client_id.clone(),
                    image_url: image_url.to_string(),
                },
            )
            .await;
        if kiosk != Delivery::Delivered {
            tracing::warn!("Upload notification to kiosk of event '{}': {:?}", event_id, kiosk);
        }

        let mobile = self
            .registry
            .send_to_mobile(
                client_id,
                MobileMessage::UploadSuccess {
                    image_url: image_url.to_string(),
                },
            )
            .await;
        if mobile != Delivery::Delivered {
            tracing::warn!("Upload notification to client '{}': {:?}", client_id, mobile);
        }
    }
}
