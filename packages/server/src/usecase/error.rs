//! UseCase errors

use thiserror::Error;

use crate::domain::StorageError;

/// Failure accepting a kiosk or mobile connection
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum RegisterEventError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum GetEventError {
    #[error("Event '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure of the upload handoff. Notification problems never show up here.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Client-visible: the upload is not a readable image
    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Image processing failed: {0}")]
    Processing(String),
}
