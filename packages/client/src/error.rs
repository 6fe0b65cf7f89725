//! Error types for the client simulator.

use kioskbridge_server::domain::ValueObjectError;
use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered the upgrade with an HTTP error status
    #[error("Server rejected the connection with HTTP {0}")]
    Rejected(u16),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("--client-id is required for the mobile role")]
    MissingClientId,
}

/// A line typed by the user that could not be turned into a message
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("Invalid client id: {0}")]
    InvalidClientId(#[from] ValueObjectError),
}
