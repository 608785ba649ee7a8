//! Logging setup
//!
//! The backend only emits `tracing` events; installing a subscriber is the
//! embedding application's business. This helper covers the common case of
//! a formatted stderr logger honouring `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a formatted tracing subscriber
///
/// `default_level` is used when `RUST_LOG` is unset or invalid, e.g.
/// `"info"` or `"hid=debug"`.
pub fn setup_logging(default_level: &str) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| crate::Error::Config(format!("invalid log filter: {e}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
