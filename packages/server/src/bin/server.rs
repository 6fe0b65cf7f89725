//! Kiosk pairing and relay broker.
//!
//! Kiosks and phones connect over WebSocket; phones upload photos over HTTP.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kioskbridge-server
//! cargo run --bin kioskbridge-server -- --host 0.0.0.0 --port 3000 --data-dir /srv/events
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use kioskbridge_server::{
    config::{
        DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_KIOSK_PING_SECS,
        DEFAULT_MAX_UPLOAD_MB, DEFAULT_MOBILE_PING_SECS, DEFAULT_PORT, DEFAULT_PUBLIC_URL,
        HeartbeatConfig, ServerConfig, megabytes,
    },
    infrastructure::{repository::FileSystemEventStore, session::InMemorySessionRegistry},
    ui::Server,
};
use kioskbridge_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kioskbridge-server")]
#[command(about = "Pairing and relay broker between a photo kiosk and visitors' phones", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "KIOSKBRIDGE_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "KIOSKBRIDGE_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory holding one subdirectory per event
    #[arg(short = 'd', long, env = "KIOSKBRIDGE_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Base URL of the phone-facing page, encoded into QR codes
    #[arg(long, env = "KIOSKBRIDGE_PUBLIC_URL", default_value = DEFAULT_PUBLIC_URL)]
    public_url: String,

    /// Maximum upload size in MiB
    #[arg(long, env = "KIOSKBRIDGE_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    max_upload_mb: usize,

    /// Seconds between pings to a kiosk
    #[arg(long, env = "KIOSKBRIDGE_KIOSK_PING_SECS", default_value_t = DEFAULT_KIOSK_PING_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    kiosk_ping_secs: u64,

    /// Seconds between pings to a phone
    #[arg(long, env = "KIOSKBRIDGE_MOBILE_PING_SECS", default_value_t = DEFAULT_MOBILE_PING_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    mobile_ping_secs: u64,

    /// Seconds a receive may stay silent before it is re-armed
    #[arg(long, env = "KIOSKBRIDGE_IDLE_TIMEOUT_SECS", default_value_t = DEFAULT_IDLE_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    idle_timeout_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            data_dir: args.data_dir,
            public_url: args.public_url,
            max_upload_bytes: megabytes(args.max_upload_mb),
            heartbeat: HeartbeatConfig {
                kiosk_ping_interval: Duration::from_secs(args.kiosk_ping_secs),
                mobile_ping_interval: Duration::from_secs(args.mobile_ping_secs),
                idle_timeout: Duration::from_secs(args.idle_timeout_secs),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. EventStore
    // 2. SessionRegistry
    // 3. Server (UseCases and AppState)

    // 1. Create EventStore (one directory per event)
    if let Err(e) = tokio::fs::create_dir_all(&config.data_dir).await {
        tracing::error!(
            "Failed to create data directory {}: {}",
            config.data_dir.display(),
            e
        );
        std::process::exit(1);
    }
    let event_store = Arc::new(FileSystemEventStore::new(config.data_dir.clone()));

    // 2. Create SessionRegistry (in-memory, nothing survives a restart)
    let registry = Arc::new(InMemorySessionRegistry::new());

    // 3. Create and run the server
    let server = Server::new(config, event_store, registry);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
