//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use std::fmt;

use kioskbridge_server::domain::{ImageId, MobileInbound, MobileMessage};
use serde_json::Value;

use crate::error::ClientError;

/// Upload status reported after a reconnect when nothing was confirmed yet
pub const STATUS_SELECTED: &str = "selected";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_UPLOADED: &str = "uploaded";

/// Which side of the pairing this client plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Role {
    Kiosk,
    Mobile,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Kiosk => write!(f, "kiosk"),
            Role::Mobile => write!(f, "mobile"),
        }
    }
}

/// Build the WebSocket endpoint for `role` under the server base URL
pub fn connection_url(
    base_url: &str,
    role: Role,
    event_id: &str,
    client_id: Option<&str>,
) -> Result<String, ClientError> {
    let base_url = base_url.trim_end_matches('/');
    match role {
        Role::Kiosk => Ok(format!("{}/ws/kiosk/{}", base_url, event_id)),
        Role::Mobile => {
            let client_id = client_id.ok_or(ClientError::MissingClientId)?;
            Ok(format!("{}/ws/mobile/{}/{}", base_url, client_id, event_id))
        }
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// A rejected upgrade will be rejected again, so retrying is pointless.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Rejected(_) | ClientError::MissingClientId
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// What a phone remembers across reconnects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobileProgress {
    image_id: Option<ImageId>,
    upload_status: String,
}

impl MobileProgress {
    /// Track a message this phone is about to send
    pub fn record_sent(&mut self, message: &MobileInbound) {
        match message {
            MobileInbound::ImageSelected { image_id } => {
                self.image_id = Some(image_id.clone());
                self.upload_status = STATUS_SELECTED.to_string();
            }
            MobileInbound::UploadConfirmed { image_id } => {
                self.image_id = Some(image_id.clone());
                self.upload_status = STATUS_CONFIRMED.to_string();
            }
            _ => {}
        }
    }

    /// Track a message received from the server
    pub fn record_received(&mut self, message: &MobileMessage) {
        if let MobileMessage::UploadSuccess { .. } = message {
            self.upload_status = STATUS_UPLOADED.to_string();
        }
    }

    /// The `reconnected` message to announce on a fresh connection, if this
    /// phone had picked an image before
    pub fn reconnect_message(&self) -> Option<MobileInbound> {
        self.image_id
            .clone()
            .map(|image_id| MobileInbound::Reconnected {
                image_id,
                upload_status: Value::String(self.upload_status.clone()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_url_for_kiosk() {
        // テスト項目: キオスクの接続先 URL が組み立てられる
        // given (前提条件):
        let base_url = "ws://127.0.0.1:8080/";

        // when (操作):
        let result = connection_url(base_url, Role::Kiosk, "E1", None);

        // then (期待する結果):
        assert_eq!(result.unwrap(), "ws://127.0.0.1:8080/ws/kiosk/E1");
    }

    #[test]
    fn test_connection_url_for_mobile() {
        // テスト項目: モバイルの接続先 URL には client_id が含まれる
        // given (前提条件):
        let base_url = "ws://127.0.0.1:8080";

        // when (操作):
        let result = connection_url(base_url, Role::Mobile, "E1", Some("c2"));

        // then (期待する結果):
        assert_eq!(result.unwrap(), "ws://127.0.0.1:8080/ws/mobile/c2/E1");
    }

    #[test]
    fn test_connection_url_for_mobile_requires_client_id() {
        // テスト項目: モバイルで client_id がない場合はエラーになる
        // given (前提条件):
        let base_url = "ws://127.0.0.1:8080";

        // when (操作):
        let result = connection_url(base_url, Role::Mobile, "E1", None);

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::MissingClientId)));
    }

    #[test]
    fn test_should_exit_immediately_when_rejected() {
        // テスト項目: 接続が HTTP エラーで拒否された場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::Rejected(400);

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_when_rejected() {
        // テスト項目: 拒否された場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::Rejected(400);

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_fresh_phone_announces_nothing() {
        // テスト項目: 画像未選択のモバイルは再接続時に何も送らない
        // given (前提条件):
        let progress = MobileProgress::default();

        // when (操作):
        let message = progress.reconnect_message();

        // then (期待する結果):
        assert_eq!(message, None);
    }

    #[test]
    fn test_progress_tracks_latest_image_and_status() {
        // テスト項目: 最後に選択した画像とアップロード状態が再接続メッセージに反映される
        // given (前提条件):
        let mut progress = MobileProgress::default();
        progress.record_sent(&MobileInbound::ImageSelected {
            image_id: ImageId::from("1"),
        });
        progress.record_sent(&MobileInbound::UploadConfirmed {
            image_id: ImageId::from("2"),
        });

        // when (操作):
        progress.record_received(&MobileMessage::UploadSuccess {
            image_url: "/images/E1/x.jpg".to_string(),
        });

        // then (期待する結果):
        assert_eq!(
            progress.reconnect_message(),
            Some(MobileInbound::Reconnected {
                image_id: ImageId::from("2"),
                upload_status: Value::from(STATUS_UPLOADED),
            })
        );
    }
}
