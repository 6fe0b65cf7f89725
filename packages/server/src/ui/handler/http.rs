//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{ClientId, EventId},
    infrastructure::{
        dto::http::{
            CreateEventRequest, EventCreatedDto, EventDetailDto, SessionSnapshotDto,
            UploadResponseDto,
        },
        image::normalizer::STORED_EXTENSION,
    },
    ui::state::AppState,
};

use super::ApiError;

/// Multipart field carrying the uploaded image
pub const UPLOAD_FIELD: &str = "file";

/// Register a new event and return the URL its QR code should encode
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<EventCreatedDto>, ApiError> {
    let registered = state
        .register_event_usecase
        .execute(request.event_name)
        .await?;
    tracing::info!(
        "Event '{}' registered as {}",
        registered.event.name.as_str(),
        registered.event.id
    );

    Ok(Json(EventCreatedDto {
        event_id: registered.event.id.as_str().to_string(),
        event_name: registered.event.name.as_str().to_string(),
        qr_url: registered.qr_url,
    }))
}

/// Get event metadata without creating it
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventDetailDto>, ApiError> {
    let event_id = EventId::try_from(event_id)?;
    let event = state.get_event_usecase.execute(&event_id).await?;
    Ok(Json(event.into()))
}

/// Upload handoff: store the image, then notify both peers
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path((event_id, client_id)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponseDto>, ApiError> {
    let event_id = EventId::try_from(event_id)?;
    let client_id = ClientId::try_from(client_id)?;

    let mut bytes = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            bytes = Some(field.bytes().await?.to_vec());
            break;
        }
    }
    let bytes = bytes.ok_or_else(|| {
        ApiError::BadRequest(format!("Missing multipart field '{}'", UPLOAD_FIELD))
    })?;
    tracing::debug!(
        "Received {} bytes from client '{}' for event '{}'",
        bytes.len(),
        client_id,
        event_id
    );

    let receipt = state
        .ingest_upload_usecase
        .execute(event_id, client_id, bytes)
        .await?;

    Ok(Json(UploadResponseDto {
        success: true,
        filename: receipt.filename,
        image_url: receipt.image_url,
    }))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint listing live connections (for testing purposes)
pub async fn debug_sessions(State(state): State<Arc<AppState>>) -> Json<SessionSnapshotDto> {
    let snapshot = state.get_sessions_usecase.execute().await;
    Json(snapshot.into())
}

/// Guard for the static image mount: anything but a stored image is a 404,
/// so event metadata in the same directories is never served.
pub async fn only_stored_images(request: Request, next: Next) -> Response {
    let is_stored_image = std::path::Path::new(request.uri().path())
        .extension()
        .is_some_and(|ext| ext == STORED_EXTENSION);
    if !is_stored_image {
        tracing::debug!("Refusing to serve {}", request.uri().path());
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}
