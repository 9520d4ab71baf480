//! Domain layer containing the definition graph and the values that flow
//! through plugin methods.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, locale tags, money, errors)
//! - `validation` - Declarative schemas and the validator
//! - `registry` - Identity map for referenceable definitions
//! - `localization` - Locale-keyed text with dialect fallback
//! - `transaction` - Per-call context handed to plugin methods
//! - `definitions` - Carriers, services, packaging (registered, immutable)
//! - `values` - Business-method arguments and results

pub mod definitions;
pub mod foundation;
pub mod localization;
pub mod registry;
pub mod transaction;
pub mod validation;
pub mod values;
