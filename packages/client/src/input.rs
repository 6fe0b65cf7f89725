//! Parsing of lines typed at the prompt.

use kioskbridge_server::domain::{ClientId, ImageId, KioskInbound, MobileInbound};
use serde_json::json;

use crate::error::InputError;

pub const KIOSK_USAGE: &str = "<client_id> <text>";
pub const MOBILE_USAGE: &str = "select <image_id> | confirm <image_id>";

/// `<client_id> <text>` becomes a `send_to_mobile` carrying `{"text": ...}`
pub fn parse_kiosk_input(line: &str) -> Result<KioskInbound, InputError> {
    let (client_id, text) = line
        .trim()
        .split_once(char::is_whitespace)
        .ok_or(InputError::Usage(KIOSK_USAGE))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Usage(KIOSK_USAGE));
    }

    Ok(KioskInbound::SendToMobile {
        client_id: ClientId::new(client_id.to_string())?,
        content: json!({ "text": text }),
    })
}

pub fn parse_mobile_input(line: &str) -> Result<MobileInbound, InputError> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("select"), Some(image_id), None) => Ok(MobileInbound::ImageSelected {
            image_id: ImageId::from(image_id),
        }),
        (Some("confirm"), Some(image_id), None) => Ok(MobileInbound::UploadConfirmed {
            image_id: ImageId::from(image_id),
        }),
        _ => Err(InputError::Usage(MOBILE_USAGE)),
    }
}
