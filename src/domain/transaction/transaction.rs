//! The per-call correlation context handed to every plugin method.

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use super::Session;
use crate::domain::foundation::{LocaleTag, SdkError, TransactionId};
use crate::domain::validation::{Schema, StringFormat};

static TRANSACTION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("id", Schema::uuid())
        .optional("language", Schema::string().format(StringFormat::LocaleTag))
        .optional("useSandbox", Schema::boolean())
        .optional("isRetry", Schema::boolean())
        .optional("session", Schema::any_object())
        .into()
});

/// Correlation id, locale, sandbox flag, retry flag, and session state
/// for one business-method call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: TransactionId,
    language: LocaleTag,
    use_sandbox: bool,
    is_retry: bool,
    session: Session,
}

impl Transaction {
    pub fn new(id: TransactionId, language: LocaleTag) -> Self {
        Self {
            id,
            language,
            use_sandbox: false,
            is_retry: false,
            session: Session::new(),
        }
    }

    /// Validates and builds a transaction from its raw form.
    ///
    /// `language` defaults to `default_language` when omitted.
    pub fn from_value(raw: &Value, default_language: &LocaleTag) -> Result<Self, SdkError> {
        crate::domain::validation::validate(raw, "transaction", &TRANSACTION_SCHEMA)?;

        let id = raw["id"]
            .as_str()
            .unwrap_or_default()
            .parse::<TransactionId>()
            .map_err(|e| SdkError::invalid(format!("Invalid transaction: id {}.", e)))?;
        let language = match raw.get("language").and_then(Value::as_str) {
            Some(tag) => LocaleTag::new(tag)?,
            None => default_language.clone(),
        };
        let session = raw
            .get("session")
            .and_then(Value::as_object)
            .cloned()
            .map(Session::from_map)
            .unwrap_or_default();

        Ok(Self {
            id,
            language,
            use_sandbox: raw.get("useSandbox").and_then(Value::as_bool).unwrap_or(false),
            is_retry: raw.get("isRetry").and_then(Value::as_bool).unwrap_or(false),
            session,
        })
    }

    pub fn with_sandbox(mut self, use_sandbox: bool) -> Self {
        self.use_sandbox = use_sandbox;
        self
    }

    pub fn with_retry(mut self, is_retry: bool) -> Self {
        self.is_retry = is_retry;
        self
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn language(&self) -> &LocaleTag {
        &self.language
    }

    pub fn use_sandbox(&self) -> bool {
        self.use_sandbox
    }

    /// Whether the host is re-attempting a call it already made.
    pub fn is_retry(&self) -> bool {
        self.is_retry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
