//! Localization configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::LocaleTag;

/// Localization configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LocalizationConfig {
    /// Language a transaction uses when it does not name one
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

impl LocalizationConfig {
    /// The default locale as a parsed tag
    pub fn default_locale_tag(&self) -> Result<LocaleTag, ValidationError> {
        LocaleTag::new(self.default_locale.as_str())
            .map_err(|_| ValidationError::InvalidLocale(self.default_locale.clone()))
    }

    /// Validate localization configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.default_locale_tag().map(|_| ())
    }
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}
