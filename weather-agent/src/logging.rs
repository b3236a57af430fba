//! Logging initialization for the binary.
//!
//! - **RUST_LOG**: filter, e.g. `toolloop=debug`. Default `warn` (`info` with `--verbose`).
//! - **LOG_FILE**: when set, logs are appended to that file without ANSI colors;
//!   otherwise they go to stderr so stdout carries only the reply.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_filter(filter);
        tracing_subscriber::registry().with(layer).try_init()?;
        tracing::info!(path = %path, "weather-agent logging to file");
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter);
        tracing_subscriber::registry().with(layer).try_init()?;
    }
    Ok(())
}
