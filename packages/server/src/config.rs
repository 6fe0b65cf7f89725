//! Server configuration

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data/events";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 20;
pub const DEFAULT_KIOSK_PING_SECS: u64 = 5;
pub const DEFAULT_MOBILE_PING_SECS: u64 = 30;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Liveness settings for persistent connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    pub kiosk_ping_interval: Duration,
    pub mobile_ping_interval: Duration,
    /// How long a receive may stay silent before the loop re-checks the
    /// connection. Silence alone never closes a connection.
    pub idle_timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            kiosk_ping_interval: Duration::from_secs(DEFAULT_KIOSK_PING_SECS),
            mobile_ping_interval: Duration::from_secs(DEFAULT_MOBILE_PING_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Root directory of event namespaces
    pub data_dir: PathBuf,
    /// Base URL of the phone-facing page encoded in QR codes
    pub public_url: String,
    pub max_upload_bytes: usize,
    pub heartbeat: HeartbeatConfig,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            max_upload_bytes: megabytes(DEFAULT_MAX_UPLOAD_MB),
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

pub fn megabytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}
