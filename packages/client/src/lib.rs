//! Command-line peer simulator for the kiosk bridge.
//!
//! Plays either side of a pairing: a kiosk relaying text to phones, or a phone
//! selecting and confirming images.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod input;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
pub use session::SessionOptions;
