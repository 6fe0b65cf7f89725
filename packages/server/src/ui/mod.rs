//! HTTP and WebSocket surface of the broker.

mod handler;
mod heartbeat;
mod server;
mod signal;
pub mod state;

pub use heartbeat::PeerRole;
pub use server::Server;
