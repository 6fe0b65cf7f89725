//! HTTP request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::{Event, SessionSnapshot};
use kioskbridge_shared::time::timestamp_to_rfc3339;

/// `POST /events` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub event_name: String,
}

/// `POST /events` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCreatedDto {
    pub event_id: String,
    pub event_name: String,
    pub qr_url: String,
}

/// `GET /events/{event_id}` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetailDto {
    pub event_id: String,
    pub event_name: String,
    /// RFC 3339
    pub created_at: String,
}

impl From<Event> for EventDetailDto {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.id.as_str().to_string(),
            event_name: event.name.as_str().to_string(),
            created_at: timestamp_to_rfc3339(event.created_at),
        }
    }
}

/// `POST /images/upload/{event_id}/{client_id}` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponseDto {
    pub success: bool,
    pub filename: String,
    pub image_url: String,
}

/// One registered phone in `GET /debug/sessions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileSessionDto {
    pub client_id: String,
    pub event_id: String,
}

/// `GET /debug/sessions` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshotDto {
    pub kiosks: Vec<String>,
    pub mobiles: Vec<MobileSessionDto>,
}

impl From<SessionSnapshot> for SessionSnapshotDto {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            kiosks: snapshot
                .kiosks
                .into_iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            mobiles: snapshot
                .mobiles
                .into_iter()
                .map(|(client_id, event_id)| MobileSessionDto {
                    client_id: client_id.into_string(),
                    event_id: event_id.as_str().to_string(),
                })
                .collect(),
        }
    }
}

/// Error body for every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, EventId, EventName};

    #[test]
    fn test_event_detail_from_event() {
        // テスト項目: Event から EventDetailDto への変換で作成日時が RFC 3339 になる
        // given (前提条件):
        let event = Event::new(
            EventId::new("E".to_string()).unwrap(),
            EventName::new("Birthday".to_string()),
            1672531200000,
        );

        // when (操作):
        let dto: EventDetailDto = event.into();

        // then (期待する結果):
        assert_eq!(dto.event_id, "E");
        assert_eq!(dto.event_name, "Birthday");
        assert_eq!(dto.created_at, "2023-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_session_snapshot_conversion() {
        // テスト項目: SessionSnapshot が DTO に変換される
        // given (前提条件):
        let snapshot = SessionSnapshot {
            kiosks: vec![EventId::new("E".to_string()).unwrap()],
            mobiles: vec![(
                ClientId::new("c1".to_string()).unwrap(),
                EventId::new("E".to_string()).unwrap(),
            )],
        };

        // when (操作):
        let dto: SessionSnapshotDto = snapshot.into();

        // then (期待する結果):
        assert_eq!(dto.kiosks, vec!["E".to_string()]);
        assert_eq!(
            dto.mobiles,
            vec![MobileSessionDto {
                client_id: "c1".to_string(),
                event_id: "E".to_string(),
            }]
        );
    }
}
