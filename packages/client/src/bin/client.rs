//! Command-line peer simulator for the kiosk bridge.
//!
//! Connects as a kiosk or as a phone, prints every message it receives and
//! answers heartbeats. Automatically reconnects on disconnection (max 5
//! attempts with 5 second interval); a phone re-announces its last selection
//! after reconnecting.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kioskbridge-client -- --role kiosk --event-id E1
//! cargo run --bin kioskbridge-client -- --role mobile --event-id E1 --client-id c1
//! ```

use clap::Parser;

use kioskbridge_client::{SessionOptions, domain::Role, run_client};
use kioskbridge_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kioskbridge-client")]
#[command(about = "Kiosk or phone simulator for the kiosk bridge", long_about = None)]
struct Args {
    /// Side of the pairing to play
    #[arg(short = 'r', long, value_enum)]
    role: Role,

    /// Event to join
    #[arg(short = 'e', long)]
    event_id: String,

    /// Phone identity (required for the mobile role)
    #[arg(short = 'c', long, required_if_eq("role", "mobile"))]
    client_id: Option<String>,

    /// WebSocket server base URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let options = SessionOptions {
        url: args.url,
        role: args.role,
        event_id: args.event_id,
        client_id: args.client_id,
    };

    // Run the client
    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
