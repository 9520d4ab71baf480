//! Declarative schema validation.
//!
//! Every value that crosses into the SDK, whether a definition tree or a
//! business-method argument or a plugin's return value, is checked here
//! before any domain object is built from it.
//!
//! - `schema` - builder types describing the expected shape
//! - `validator` - the interpreter that aggregates violations
//! - `violation` - individual constraint failures
//! - `formats` - string format checks (dates, zones, paths, websites)

mod formats;
mod schema;
mod validator;
mod violation;

pub use schema::{ArraySchema, NumberSchema, ObjectSchema, Schema, StringFormat, StringSchema};
pub use validator::{collect_violations, validate};
pub use violation::{ConstraintViolation, Violations};

pub(crate) use formats::is_website;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::foundation::SdkError;

/// A type with a static schema describing its raw JSON form.
pub trait Schematic {
    /// Name used in error messages, e.g. "delivery service".
    const LABEL: &'static str;

    fn schema() -> &'static Schema;

    /// Validates a raw value against [`Self::schema`].
    fn validate(raw: &Value) -> Result<&Value, SdkError> {
        validate(raw, Self::LABEL, Self::schema())
    }
}

/// Deserializes a value that has already passed its schema.
pub(crate) fn decode<T: DeserializeOwned>(raw: &Value, label: &str) -> Result<T, SdkError> {
    T::deserialize(raw).map_err(|e| SdkError::invalid(format!("Invalid {}: {}.", label, e)))
}
