//! Utilities shared by the kioskbridge server and client.

pub mod logger;
pub mod time;
