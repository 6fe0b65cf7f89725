//! Value objects
//!
//! `EventId` and `ClientId` end up as directory names and map keys, so they are
//! validated once at the boundary and trusted afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of an event or client identifier
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

fn validate_identifier(kind: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::Empty(kind));
    }
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValueObjectError::TooLong {
            kind,
            max: MAX_IDENTIFIER_LENGTH,
        });
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValueObjectError::InvalidCharacters(kind, value.to_string()));
    }
    Ok(())
}

/// Event ID: the pairing namespace created per kiosk session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_identifier("event_id", &value)?;
        Ok(Self(value))
    }

    /// Generate a fresh, collision-resistant event ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Client ID: chosen by the phone to identify itself across reconnects
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_identifier("client_id", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Wire messages carry client IDs, so invalid ones are rejected while decoding.
impl<'de> Deserialize<'de> for ClientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Event display name
///
/// Free text chosen by whoever creates the event. Stored exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventName(String);

impl EventName {
    /// Name used when an event is created implicitly on first access
    pub const AUTO_GENERATED: &'static str = "Auto Generated Event";

    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn auto_generated() -> Self {
        Self(Self::AUTO_GENERATED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EventName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Image ID: an opaque token the phone picks (often a timestamp).
///
/// Only used to correlate messages between the two peers. Any JSON value is
/// accepted and relayed in the form it arrived in; it never touches storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(serde_json::Value);

impl ImageId {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(text) => f.write_str(text),
            other => write!(f, "{}", other),
        }
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(serde_json::Value::String(value.to_string()))
    }
}

impl From<serde_json::Value> for ImageId {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Identity of one accepted connection.
///
/// Distinguishes a superseded connection from its replacement when both share
/// the same event or client ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
