//! Domain errors

use thiserror::Error;

/// Validation failure for a value object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{kind} must be at most {max} characters")]
    TooLong { kind: &'static str, max: usize },

    #[error("{0} contains invalid characters: '{1}'")]
    InvalidCharacters(&'static str, String),
}

/// Failure reading or writing the event namespace on disk
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt event metadata at '{path}': {source}")]
    Metadata {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure pushing a frame to a single connection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PushError {
    /// The connection's outbound loop has stopped
    #[error("Connection '{0}' is closed")]
    Closed(String),

    #[error("Failed to encode message: {0}")]
    Encode(String),
}
