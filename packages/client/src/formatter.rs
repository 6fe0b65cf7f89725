//! Message formatting utilities for client display.

use kioskbridge_server::domain::{KioskMessage, MobileMessage};
use kioskbridge_shared::time::timestamp_to_rfc3339;
use serde_json::Value;

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a message received by a kiosk
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded message
    /// * `received_at` - Unix timestamp when the message arrived (milliseconds)
    pub fn format_kiosk_message(message: &KioskMessage, received_at: i64) -> String {
        let at = timestamp_to_rfc3339(received_at);
        match message {
            KioskMessage::Ping => format!("\n~ ping at {}\n", at),
            KioskMessage::ClientConnected { client_id } => {
                format!("\n+ {} connected at {}\n", client_id, at)
            }
            KioskMessage::ClientDisconnected { client_id } => {
                format!("\n- {} disconnected at {}\n", client_id, at)
            }
            KioskMessage::ClientReconnected {
                client_id,
                image_id,
                upload_status,
            } => format!(
                "\n+ {} reconnected at {} (image {}, {})\n",
                client_id,
                at,
                image_id,
                Self::status_text(upload_status)
            ),
            KioskMessage::ImageSelected {
                client_id,
                image_id,
            } => format!("\n* {} selected image {} at {}\n", client_id, image_id, at),
            KioskMessage::UploadConfirmed {
                client_id,
                image_id,
            } => format!("\n* {} confirmed image {} at {}\n", client_id, image_id, at),
            KioskMessage::ImageUploaded {
                client_id,
                image_url,
            } => format!(
                "\n\n{RULE}\n@{}: uploaded {}\nreceived at {}\n{RULE}\n",
                client_id, image_url, at
            ),
        }
    }

    /// Format a message received by a phone
    pub fn format_mobile_message(message: &MobileMessage, received_at: i64) -> String {
        let at = timestamp_to_rfc3339(received_at);
        match message {
            MobileMessage::Ping => format!("\n~ ping at {}\n", at),
            MobileMessage::MessageFromKiosk { content } => format!(
                "\n\n{RULE}\n@kiosk: {}\nreceived at {}\n{RULE}\n",
                Self::content_text(content),
                at
            ),
            MobileMessage::UploadSuccess { image_url } => {
                format!("\n* upload stored as {} at {}\n", image_url, at)
            }
        }
    }

    /// Format text that could not be decoded
    pub fn format_raw_message(text: &str) -> String {
        format!("\n? {}\n", text)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n? binary message ({} bytes)\n", byte_count)
    }

    /// Format a confirmation message after sending
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        format!("sent at {}\n", timestamp_to_rfc3339(sent_at))
    }

    /// `{"text": ...}` payloads print as their text, anything else as JSON
    fn status_text(status: &Value) -> String {
        match status {
            Value::String(text) => text.clone(),
            Value::Null => "no status".to_string(),
            other => other.to_string(),
        }
    }

    fn content_text(content: &Value) -> String {
        match content.get("text").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => content.to_string(),
        }
    }
}
