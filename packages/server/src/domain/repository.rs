//! EventStore trait 定義
//!
//! The use cases depend on this interface; the filesystem implementation
//! lives in the infrastructure layer.

use async_trait::async_trait;

use super::{Event, EventId, EventName, StorageError, UploadedImage};

/// Event namespace storage
///
/// An event is a directory keyed by its ID holding one metadata record and the
/// images uploaded for it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create a new event with a freshly generated ID
    async fn register(&self, name: EventName) -> Result<Event, StorageError>;

    /// Return the event, creating it with the auto-generated name if missing.
    ///
    /// Repeated calls for the same ID return the first record unchanged.
    async fn ensure_exists(&self, event_id: &EventId) -> Result<Event, StorageError>;

    /// Look up an event without creating it
    async fn find(&self, event_id: &EventId) -> Result<Option<Event>, StorageError>;

    /// Write an image file into the event's namespace
    async fn save_image(
        &self,
        event_id: &EventId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<UploadedImage, StorageError>;
}
