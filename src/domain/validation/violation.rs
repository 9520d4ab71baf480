//! Individual constraint violations collected by the validator.

use thiserror::Error;

/// A single failed constraint at a path inside the validated value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("{path} is required")]
    MissingRequired { path: String },

    #[error("{path} is required when {field} is \"{equals}\"")]
    ConditionallyRequired {
        path: String,
        field: String,
        equals: String,
    },

    #[error("{path} must be a {expected}, got {actual}")]
    InvalidType {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("{path} cannot be empty")]
    Empty { path: String },

    #[error("{path} must be a single line of text")]
    MultiLine { path: String },

    #[error("{path} must be one of {allowed}")]
    NotAllowed { path: String, allowed: String },

    #[error("{path} must be a valid {format}")]
    InvalidFormat { path: String, format: String },

    #[error("{path} must be at least {min}, got {actual}")]
    TooSmall { path: String, min: String, actual: String },

    #[error("{path} must be at most {max}, got {actual}")]
    TooLarge { path: String, max: String, actual: String },

    #[error("{path} must contain at least {min} item(s), got {actual}")]
    TooFewItems {
        path: String,
        min: usize,
        actual: usize,
    },

    #[error("{path} is not allowed")]
    UnknownField { path: String },
}

impl ConstraintViolation {
    /// The path the violation refers to.
    pub fn path(&self) -> &str {
        match self {
            ConstraintViolation::MissingRequired { path }
            | ConstraintViolation::ConditionallyRequired { path, .. }
            | ConstraintViolation::InvalidType { path, .. }
            | ConstraintViolation::Empty { path }
            | ConstraintViolation::MultiLine { path }
            | ConstraintViolation::NotAllowed { path, .. }
            | ConstraintViolation::InvalidFormat { path, .. }
            | ConstraintViolation::TooSmall { path, .. }
            | ConstraintViolation::TooLarge { path, .. }
            | ConstraintViolation::TooFewItems { path, .. }
            | ConstraintViolation::UnknownField { path } => path,
        }
    }
}

/// Every violation found in one validated value, in schema declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct Violations(pub Vec<ConstraintViolation>);

fn render(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
