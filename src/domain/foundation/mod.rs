//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, locale tags, money, and the error record that
//! form the vocabulary of the SDK.

mod errors;
mod identifier;
mod ids;
mod locale;
mod money;

pub use errors::{code_of, ErrorCode, SdkError};
pub use identifier::{identifiers_schema, DefinitionIdentifier, Identifiable};
pub use ids::{DefinitionId, TransactionId};
pub use locale::LocaleTag;
pub use money::{Currency, MonetaryValue};
