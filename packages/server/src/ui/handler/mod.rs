//! Request handlers.

mod error;
mod http;
mod websocket;

pub use error::ApiError;
pub use http::{
    create_event, debug_sessions, get_event, health_check, only_stored_images, upload_image,
};
pub use websocket::{kiosk_ws_handler, mobile_ws_handler};
