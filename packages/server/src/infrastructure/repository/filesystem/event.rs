//! Filesystem EventStore 実装
//!
//! Layout under the root directory:
//!
//! ```text
//! {root}/{event_id}/event.json    metadata record
//! {root}/{event_id}/{filename}    uploaded images
//! ```
//!
//! The root is also what the static `/images` route serves, so an image is
//! reachable at `/images/{event_id}/{filename}`.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use kioskbridge_shared::time::{Clock, SystemClock};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use crate::domain::{Event, EventId, EventName, EventStore, StorageError, UploadedImage};

/// Name of the metadata record inside an event directory
pub const METADATA_FILE: &str = "event.json";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// EventStore that keeps one directory per event
pub struct FileSystemEventStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
    /// Serializes lookup-or-create so concurrent first accesses write one record
    creation_lock: Mutex<()>,
}

impl FileSystemEventStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(SystemClock))
    }

    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
            creation_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn event_dir(&self, event_id: &EventId) -> PathBuf {
        self.root.join(event_id.as_str())
    }

    fn metadata_path(&self, event_id: &EventId) -> PathBuf {
        self.event_dir(event_id).join(METADATA_FILE)
    }

    async fn read_metadata(&self, event_id: &EventId) -> Result<Option<Event>, StorageError> {
        let path = self.metadata_path(event_id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path)(e)),
        };
        let event = serde_json::from_slice(&bytes).map_err(|source| StorageError::Metadata {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(event))
    }

    /// Create the event directory and its metadata record.
    ///
    /// The record is created exclusively; an existing one is never replaced.
    async fn create_event(&self, event: &Event) -> Result<(), StorageError> {
        let dir = self.event_dir(&event.id);
        fs::create_dir_all(&dir).await.map_err(io_error(&dir))?;

        let path = self.metadata_path(&event.id);
        let body = serde_json::to_vec_pretty(event).map_err(|source| StorageError::Metadata {
            path: path.display().to_string(),
            source,
        })?;
        write_new_file(&path, &body).await?;

        tracing::info!(
            "Created event '{}' ({}) at {}",
            event.id,
            event.name.as_str(),
            dir.display()
        );
        Ok(())
    }
}

async fn write_new_file(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(io_error(path))?;
    file.write_all(bytes).await.map_err(io_error(path))?;
    file.flush().await.map_err(io_error(path))?;
    Ok(())
}

#[async_trait]
impl EventStore for FileSystemEventStore {
    async fn register(&self, name: EventName) -> Result<Event, StorageError> {
        let event = Event::new(EventId::generate(), name, self.clock.now_millis());
        let _guard = self.creation_lock.lock().await;
        self.create_event(&event).await?;
        Ok(event)
    }

    async fn ensure_exists(&self, event_id: &EventId) -> Result<Event, StorageError> {
        let _guard = self.creation_lock.lock().await;
        if let Some(event) = self.read_metadata(event_id).await? {
            return Ok(event);
        }

        let event = Event::new(
            event_id.clone(),
            EventName::auto_generated(),
            self.clock.now_millis(),
        );
        self.create_event(&event).await?;
        Ok(event)
    }

    async fn find(&self, event_id: &EventId) -> Result<Option<Event>, StorageError> {
        self.read_metadata(event_id).await
    }

    async fn save_image(
        &self,
        event_id: &EventId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<UploadedImage, StorageError> {
        let dir = self.event_dir(event_id);
        let path = dir.join(filename);
        // Only bare file names may land in the event directory.
        if path.parent() != Some(dir.as_path()) || filename == METADATA_FILE {
            return Err(io_error(&path)(std::io::Error::new(
                ErrorKind::InvalidInput,
                "invalid image file name",
            )));
        }

        fs::create_dir_all(&dir).await.map_err(io_error(&dir))?;
        if let Err(e) = write_new_file(&path, bytes).await {
            tracing::error!("Failed to write image {}: {}", path.display(), e);
            return Err(e);
        }

        tracing::info!(
            "Saved image {} ({} bytes) for event '{}'",
            filename,
            bytes.len(),
            event_id
        );
        Ok(UploadedImage {
            event_id: event_id.clone(),
            filename: filename.to_string(),
            size_bytes: bytes.len() as u64,
        })
    }
}
