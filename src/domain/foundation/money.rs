//! Monetary values and currency-safe aggregation.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::SdkError;

static CURRENCY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern is valid"));

/// ISO-4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Result<Self, SdkError> {
        let code = code.into();
        if !Self::is_valid(&code) {
            return Err(SdkError::invalid(format!(
                "{:?} is not a valid ISO 4217 currency code.",
                code
            )));
        }
        Ok(Self(code))
    }

    pub fn is_valid(code: &str) -> bool {
        CURRENCY_PATTERN.is_match(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = SdkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

/// An amount of money in a single currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryValue {
    pub value: f64,
    pub currency: Currency,
}

impl MonetaryValue {
    pub fn new(value: f64, currency: Currency) -> Self {
        Self { value, currency }
    }

    /// Sums a list of values that must share one currency.
    ///
    /// Zero amounts do not constrain the currency. When nothing non-zero is
    /// left, the result is zero in `fallback_currency`.
    pub fn sum<'a, I>(values: I, fallback_currency: &Currency) -> Result<MonetaryValue, SdkError>
    where
        I: IntoIterator<Item = &'a MonetaryValue>,
    {
        let mut currencies = BTreeSet::new();
        let mut total = 0.0;

        for amount in values {
            if amount.value != 0.0 {
                currencies.insert(amount.currency.clone());
            }
            total += amount.value;
        }

        if currencies.len() > 1 {
            let found: Vec<&str> = currencies.iter().map(Currency::as_str).collect();
            return Err(SdkError::currency_mismatch(format!(
                "All charges must be in the same currency. Found: {}.",
                found.join(", ")
            ))
            .with_detail("currencies", found.join(",")));
        }

        let currency = currencies
            .into_iter()
            .next()
            .unwrap_or_else(|| fallback_currency.clone());

        Ok(MonetaryValue::new(total, currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn usd() -> Currency {
        Currency::new("USD").unwrap()
    }

    fn money(value: f64, currency: &str) -> MonetaryValue {
        MonetaryValue::new(value, Currency::new(currency).unwrap())
    }

    #[test]
    fn sums_same_currency() {
        let total = MonetaryValue::sum(&[money(100.0, "USD"), money(50.0, "USD")], &usd()).unwrap();
        assert_eq!(total, money(150.0, "USD"));
    }

    #[test]
    fn mixed_currencies_fail_naming_both() {
        let err = MonetaryValue::sum(&[money(100.0, "USD"), money(50.0, "EUR")], &usd()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CurrencyMismatch);
        assert!(err.message.contains("USD"));
        assert!(err.message.contains("EUR"));
    }

    #[test]
    fn empty_sum_uses_fallback_currency() {
        let eur = Currency::new("EUR").unwrap();
        let total = MonetaryValue::sum(&[], &eur).unwrap();
        assert_eq!(total, money(0.0, "EUR"));
    }

    #[test]
    fn zero_amounts_do_not_constrain_currency() {
        let total = MonetaryValue::sum(&[money(0.0, "EUR"), money(12.5, "CAD")], &usd()).unwrap();
        assert_eq!(total, money(12.5, "CAD"));
    }

    #[test]
    fn currency_rejects_lowercase() {
        assert!(Currency::new("usd").is_err());
        assert!(Currency::new("US").is_err());
    }
}
