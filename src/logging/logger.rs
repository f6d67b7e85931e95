// file: src/logging/logger.rs
// version: 1.1.0
// guid: 027de484-8e4f-496d-b39d-7d8e02fae559

//! Logger initialization and configuration

use crate::error::{Result, SkyError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Logs go to stderr so formatted command output owns stdout. `RUST_LOG`
/// overrides the flag-derived filter.
pub fn init_logger(debug: bool) -> Result<()> {
    let filter = if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
        EnvFilter::from_default_env()
    } else if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| SkyError::config(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}
