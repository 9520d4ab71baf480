//! Error types for the SDK.
//!
//! Every failure a host can observe is an [`SdkError`]: a stable
//! [`ErrorCode`], a human-readable message, and, when the failure happened
//! inside a business method, the transaction it belongs to and the error
//! that caused it.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::TransactionId;

/// Error codes surfaced to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A value failed its schema.
    Invalid,
    /// A business-method argument failed validation before invocation.
    InvalidInput,
    /// Plugin code failed or returned an invalid value.
    AppError,
    Unauthorized,
    /// A downstream service called by the plugin failed.
    External,
    /// A monetary aggregation mixed currencies.
    CurrencyMismatch,
}

impl ErrorCode {
    /// Returns the stable wire form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Invalid => "INVALID",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::AppError => "APP_ERROR",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::External => "EXTERNAL",
            ErrorCode::CurrencyMismatch => "CURRENCY_MISMATCH",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error record returned by every SDK entry point.
///
/// Never mutated after it reaches the caller. The wrapped cause is exposed
/// through [`Error::source`] so the full chain of messages survives.
#[derive(Debug, Clone)]
pub struct SdkError {
    pub code: ErrorCode,
    pub message: String,
    pub transaction_id: Option<TransactionId>,
    pub original_code: Option<ErrorCode>,
    pub original_error: Option<Arc<dyn Error + Send + Sync>>,
    pub details: HashMap<String, String>,
}

impl SdkError {
    /// Creates a new error with no cause attached.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            transaction_id: None,
            original_code: None,
            original_error: None,
            details: HashMap::new(),
        }
    }

    /// Creates an `Invalid` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Invalid, message)
    }

    /// Creates a `CurrencyMismatch` error.
    pub fn currency_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CurrencyMismatch, message)
    }

    /// Attaches the transaction this error belongs to.
    pub fn with_transaction_id(mut self, id: TransactionId) -> Self {
        self.transaction_id = Some(id);
        self
    }

    /// Chains an underlying error as the cause.
    ///
    /// If the cause is itself an `SdkError`, its `original_code` is carried
    /// forward, falling back to its own code.
    pub fn caused_by(mut self, cause: Arc<dyn Error + Send + Sync>) -> Self {
        self.original_code = cause
            .downcast_ref::<SdkError>()
            .map(|inner| inner.original_code.unwrap_or(inner.code));
        self.original_error = Some(cause);
        self
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns the message of the wrapped cause, if any.
    pub fn original_message(&self) -> Option<String> {
        self.original_error.as_ref().map(|e| match e.downcast_ref::<SdkError>() {
            Some(inner) => inner.message.clone(),
            None => e.to_string(),
        })
    }
}

/// Returns the SDK code carried by an arbitrary error, if it is an `SdkError`.
pub fn code_of(error: &(dyn Error + Send + Sync + 'static)) -> Option<ErrorCode> {
    error.downcast_ref::<SdkError>().map(|e| e.code)
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for SdkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.original_error
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(ErrorCode::InvalidInput.to_string(), "INVALID_INPUT");
        assert_eq!(ErrorCode::CurrencyMismatch.to_string(), "CURRENCY_MISMATCH");
    }

    #[test]
    fn error_code_serializes_to_wire_form() {
        let json = serde_json::to_string(&ErrorCode::AppError).unwrap();
        assert_eq!(json, "\"APP_ERROR\"");
    }

    #[test]
    fn sdk_error_displays_code_and_message() {
        let err = SdkError::invalid("Invalid packaging");
        assert_eq!(err.to_string(), "[INVALID] Invalid packaging");
    }

    #[test]
    fn caused_by_records_original_code_and_source() {
        let inner = SdkError::new(ErrorCode::Unauthorized, "bad credentials");
        let outer = SdkError::new(ErrorCode::AppError, "wrapped").caused_by(Arc::new(inner));

        assert_eq!(outer.original_code, Some(ErrorCode::Unauthorized));
        assert_eq!(outer.original_message().as_deref(), Some("bad credentials"));
        assert!(outer.source().unwrap().to_string().contains("bad credentials"));
    }

    #[test]
    fn caused_by_carries_the_innermost_code_forward() {
        let root = SdkError::new(ErrorCode::Unauthorized, "bad credentials");
        let middle = SdkError::new(ErrorCode::AppError, "wrapped once").caused_by(Arc::new(root));
        let outer = SdkError::new(ErrorCode::AppError, "wrapped twice").caused_by(Arc::new(middle));

        assert_eq!(outer.original_code, Some(ErrorCode::Unauthorized));
        assert_eq!(outer.original_message().as_deref(), Some("wrapped once"));
    }

    #[test]
    fn caused_by_foreign_error_has_no_original_code() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let outer = SdkError::invalid("wrapped").caused_by(Arc::new(io));

        assert_eq!(outer.original_code, None);
        assert_eq!(outer.original_message().as_deref(), Some("disk full"));
    }

    #[test]
    fn with_detail_adds_detail() {
        let err = SdkError::invalid("x").with_detail("label", "rate");
        assert_eq!(err.details.get("label"), Some(&"rate".to_string()));
    }
}
