//! SDK configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `INTEGRATION_SDK` prefix and nested values use double underscores as separators.
//! Every field has a default, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use integration_sdk::config::SdkConfig;
//!
//! let config = SdkConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Default locale: {}", config.localization.default_locale);
//! ```

mod error;
mod localization;
mod logging;
mod money;

pub use error::{ConfigError, ValidationError};
pub use localization::LocalizationConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use money::MoneyConfig;

use serde::Deserialize;

/// Root SDK configuration
///
/// Load using [`SdkConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SdkConfig {
    /// Default transaction language
    #[serde(default)]
    pub localization: LocalizationConfig,

    /// Fallback currency for empty sums
    #[serde(default)]
    pub money: MoneyConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SdkConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INTEGRATION_SDK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `INTEGRATION_SDK__LOCALIZATION__DEFAULT_LOCALE=fr` -> `localization.default_locale = "fr"`
    /// - `INTEGRATION_SDK__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INTEGRATION_SDK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a malformed locale tag, a malformed
    /// currency code, or an unknown log level.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.localization.validate()?;
        self.money.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "INTEGRATION_SDK__LOCALIZATION__DEFAULT_LOCALE",
        "INTEGRATION_SDK__MONEY__DEFAULT_CURRENCY",
        "INTEGRATION_SDK__LOGGING__LEVEL",
        "INTEGRATION_SDK__LOGGING__FORMAT",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = SdkConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.localization.default_locale, "en");
        assert_eq!(config.money.default_currency, "USD");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("INTEGRATION_SDK__LOCALIZATION__DEFAULT_LOCALE", "fr-CA");
        env::set_var("INTEGRATION_SDK__MONEY__DEFAULT_CURRENCY", "CAD");
        env::set_var("INTEGRATION_SDK__LOGGING__FORMAT", "json");
        let result = SdkConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.localization.default_locale, "fr-CA");
        assert_eq!(config.money.default_currency, "CAD");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_rejects_bad_currency() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("INTEGRATION_SDK__MONEY__DEFAULT_CURRENCY", "dollars");
        let result = SdkConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidCurrency("dollars".to_string()))
        );
    }
}
