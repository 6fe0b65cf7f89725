//! HTTP error responses.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::ValueObjectError,
    infrastructure::dto::http::ErrorDto,
    usecase::{ConnectError, GetEventError, IngestError, RegisterEventError},
};

/// Error returned by handlers, rendered as `{"detail": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Logged in full; the client only sees a generic message
    #[error("{0}")]
    Internal(String),

    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Internal(reason) => {
                tracing::error!("Internal error: {}", reason);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorDto { detail })).into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Rejected {
            status: e.status(),
            detail: e.body_text(),
        }
    }
}

impl From<ConnectError> for ApiError {
    fn from(e: ConnectError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<RegisterEventError> for ApiError {
    fn from(e: RegisterEventError) -> Self {
        match e {
            RegisterEventError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<GetEventError> for ApiError {
    fn from(e: GetEventError) -> Self {
        match e {
            GetEventError::NotFound(_) => ApiError::NotFound(e.to_string()),
            GetEventError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Decode(_) => ApiError::BadRequest(e.to_string()),
            IngestError::Storage(_) | IngestError::Processing(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}
