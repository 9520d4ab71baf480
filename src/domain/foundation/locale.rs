//! BCP-47 locale tags in the `xx` / `xx-YY` subset the SDK accepts.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::SdkError;

static LOCALE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").expect("locale pattern is valid"));

/// A language tag such as `en` or `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag(String);

impl LocaleTag {
    /// Parses a locale tag, rejecting anything outside `^[a-z]{2}(-[A-Z]{2})?$`.
    pub fn new(tag: impl Into<String>) -> Result<Self, SdkError> {
        let tag = tag.into();
        if !Self::is_valid(&tag) {
            return Err(SdkError::invalid(format!(
                "{:?} is not a valid locale tag. Expected a format like \"en\" or \"en-US\".",
                tag
            )));
        }
        Ok(Self(tag))
    }

    /// Checks a raw string against the locale pattern.
    pub fn is_valid(tag: &str) -> bool {
        LOCALE_PATTERN.is_match(tag)
    }

    /// The two-letter language part.
    pub fn language(&self) -> &str {
        &self.0[..2]
    }

    /// The two-letter region part, if present.
    pub fn region(&self) -> Option<&str> {
        self.0.get(3..)
    }

    pub fn is_bare_language(&self) -> bool {
        self.region().is_none()
    }

    /// The bare language tag (`en` for `en-US`).
    pub fn language_tag(&self) -> LocaleTag {
        LocaleTag(self.language().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocaleTag {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = SdkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.0
    }
}
