//! Data Transfer Objects
//!
//! JSON bodies of the HTTP API. WebSocket messages are domain types
//! (`crate::domain::message`) because the registry sends them directly.

pub mod http;
