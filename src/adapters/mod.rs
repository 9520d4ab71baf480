//! Adapters - Connections between the SDK and its host process.
//!
//! - `telemetry` - tracing subscriber installation driven by [`LoggingConfig`]
//!
//! [`LoggingConfig`]: crate::config::LoggingConfig

pub mod telemetry;

pub use telemetry::init_tracing;
