//! Money configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::Currency;

/// Money configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MoneyConfig {
    /// Currency of a sum over no amounts
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl MoneyConfig {
    /// The default currency as a parsed code
    pub fn default_currency_code(&self) -> Result<Currency, ValidationError> {
        Currency::new(self.default_currency.as_str())
            .map_err(|_| ValidationError::InvalidCurrency(self.default_currency.clone()))
    }

    /// Validate money configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.default_currency_code().map(|_| ())
    }
}

impl Default for MoneyConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_defaults() {
        let config = MoneyConfig::default();
        assert_eq!(config.default_currency_code().unwrap().as_str(), "USD");
    }

    #[test]
    fn test_lowercase_currency_rejected() {
        let config = MoneyConfig {
            default_currency: "usd".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCurrency(_))
        ));
    }
}
