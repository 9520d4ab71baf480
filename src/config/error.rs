//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid default locale: {0}")]
    InvalidLocale(String),

    #[error("Invalid default currency: {0}")]
    InvalidCurrency(String),

    #[error("Unknown log level: {0}")]
    UnknownLogLevel(String),
}
