//! Per-line read and parse errors.

use thiserror::Error;

use crate::config::Schema;
use crate::models::Field;

/// A failure confined to a single line of a JSON log stream.
#[derive(Debug, Error)]
pub enum LineError {
    /// Reading from the source failed. Iteration ends after this error.
    #[error("I/O error while reading log stream: {0}")]
    Io(#[from] std::io::Error),

    /// The line is not valid UTF-8.
    #[error("invalid UTF-8 in log line")]
    InvalidUtf8,

    /// The line is not valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The line is valid JSON but not an object.
    #[error("log line is not a JSON object")]
    NotAnObject,

    /// A field required by the schema is absent.
    #[error("missing required field `{field}` for schema `{schema}`")]
    MissingField {
        /// The absent field.
        field: Field,
        /// The schema that requires it.
        schema: Schema,
    },

    /// A known field holds a value of the wrong JSON type.
    #[error("field `{field}` must be {expected}")]
    WrongType {
        /// The offending field.
        field: Field,
        /// Description of the accepted type.
        expected: &'static str,
    },

    /// A field has the right JSON type but an unaccepted value.
    #[error("invalid field value: {0}")]
    InvalidField(#[source] serde_json::Error),
}

impl LineError {
    /// Returns whether iteration can continue past this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
