//! Logging setup
//!
//! Installs a `tracing` subscriber: `RUST_LOG` filter (default `info`) and a
//! compact stderr layer with file and line. Library code only emits events;
//! binaries call [`init`] once at startup.

use std::io;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Install the global subscriber. Later calls are ignored.
pub fn init() {
    init_with_default("info");
}

/// Like [`init`] but with a custom filter used when `RUST_LOG` is unset.
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .compact();

    // Already installed (tests, embedding host): keep the existing one
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init_with_default("debug");
        tracing::info!(target: "rig", "logging initialised");
    }
}
