//! Tracing subscriber setup.
//!
//! Hosts call [`init_tracing`] once at startup. The level comes from
//! [`LoggingConfig`] unless `RUST_LOG` is set, in which case `RUST_LOG`
//! wins. Calling it again after a subscriber is installed is harmless.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Installs the global tracing subscriber.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_ascii_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    match installed {
        Ok(()) => {
            tracing::debug!(format = ?config.format, "tracing initialized");
            true
        }
        Err(_) => false,
    }
}
