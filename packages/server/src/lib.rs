//! Pairing and relay broker between event kiosks and mobile phones.
//!
//! A kiosk shows a QR code for an event; a phone scanning it opens a mobile
//! connection, selects a photo, and uploads it. The broker relays control
//! messages between the two, keeps at most one phone per event, and stores
//! uploads under the event's namespace.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
