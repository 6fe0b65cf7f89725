//! Logging setup shared by the kioskbridge binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the crate that owns the binary, the shared crate and the
/// binary itself. `RUST_LOG` takes precedence when set.
///
/// # Arguments
///
/// * `crate_name` - The calling crate, usually `env!("CARGO_PKG_NAME")`
/// * `binary_name` - The name of the binary (e.g., "kioskbridge-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use kioskbridge_shared::logger::setup_logger;
///
/// setup_logger("kioskbridge-server", "kioskbridge-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(crate_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the directive string used when `RUST_LOG` is not set.
fn default_filter(crate_name: &str, binary_name: &str, level: &str) -> String {
    format!(
        "{}={level},{}={level},{}={level},tower_http={level}",
        crate_name.replace('-', "_"),
        env!("CARGO_PKG_NAME").replace('-', "_"),
        binary_name.replace('-', "_"),
    )
}
