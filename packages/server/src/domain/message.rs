//! Control messages exchanged over the kiosk and mobile connections.
//!
//! Every message is a JSON object whose `type` field selects the variant.
//! Inbound enums end in an `Unknown` arm so an unrecognized `type` decodes
//! instead of failing; the router logs and drops it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value_object::{ClientId, ImageId};

/// Server → kiosk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KioskMessage {
    Ping,
    ClientConnected {
        client_id: ClientId,
    },
    ClientDisconnected {
        client_id: ClientId,
    },
    ClientReconnected {
        client_id: ClientId,
        image_id: ImageId,
        upload_status: Value,
    },
    ImageSelected {
        client_id: ClientId,
        image_id: ImageId,
    },
    UploadConfirmed {
        client_id: ClientId,
        image_id: ImageId,
    },
    ImageUploaded {
        client_id: ClientId,
        image_url: String,
    },
}

/// Server → mobile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MobileMessage {
    Ping,
    MessageFromKiosk { content: Value },
    UploadSuccess { image_url: String },
}

/// Mobile → server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MobileInbound {
    ImageSelected {
        image_id: ImageId,
    },
    UploadConfirmed {
        image_id: ImageId,
    },
    /// `upload_status` is opaque to the server and defaults to `null`
    Reconnected {
        image_id: ImageId,
        #[serde(default)]
        upload_status: Value,
    },
    Pong,
    #[serde(other)]
    Unknown,
}

/// Kiosk → server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KioskInbound {
    SendToMobile {
        client_id: ClientId,
        content: Value,
    },
    Pong,
    #[serde(other)]
    Unknown,
}
