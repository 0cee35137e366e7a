//! Tracing subscriber initialization.

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_filter` is used (for
/// example `"info"` or `"fabula=debug"`). When `json` is set, events are
/// emitted as one JSON object per line.
///
/// Returns an error if a global subscriber is already installed.
pub fn init_observability(default_filter: &str, json: bool) -> Result<(), String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let result = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))?;

    info!(json, "Tracing initialized");
    debug!(default_filter, "Default log filter");
    Ok(())
}
