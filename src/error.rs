//! Schema compile errors.

use thiserror::Error;

/// Errors returned by [`crate::compile`]. The compiler never recovers
/// partially: the first malformed line aborts the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A schema line does not match `Variant: name Type, ...`.
    #[error("malformed schema at line {line}: {reason}")]
    MalformedSchema { line: usize, reason: Malformation },

    /// The base category name is empty.
    #[error("base name must not be empty")]
    EmptyBaseName,
}

/// Why a schema line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformation {
    #[error("missing ':' between variant name and field list")]
    MissingVariantSeparator,

    #[error("missing variant name before ':'")]
    EmptyVariantName,

    #[error("empty field spec (empty field list or stray comma)")]
    EmptyField,

    #[error("field '{field}' has no type")]
    MissingFieldType { field: String },

    #[error("missing ',' after field '{field}'")]
    MissingComma { field: String },

    #[error("unbalanced brackets in field list near '{field}'")]
    UnbalancedBrackets { field: String },
}

impl SchemaError {
    pub fn malformed(line: usize, reason: Malformation) -> Self {
        Self::MalformedSchema { line, reason }
    }

    /// Index of the offending schema line, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedSchema { line, .. } => Some(*line),
            Self::EmptyBaseName => None,
        }
    }
}
