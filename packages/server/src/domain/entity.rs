//! Domain entities

use serde::{Deserialize, Serialize};

use super::value_object::{EventId, EventName};

/// A pairing namespace, persisted as the metadata record of its directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: EventName,
    /// Unix timestamp (milliseconds) when the event was created
    pub created_at: i64,
}

impl Event {
    pub fn new(id: EventId, name: EventName, created_at: i64) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }
}

/// An image written by one successful upload. Never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub event_id: EventId,
    pub filename: String,
    pub size_bytes: u64,
}
