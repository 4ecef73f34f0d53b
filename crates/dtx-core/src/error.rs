//! Error types for field classification and field-tree access.

use thiserror::Error;

/// Errors that can occur while classifying a payload or walking a field tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid value for field {field}: expected {expected}")]
    InvalidValue { field: String, expected: String },

    #[error("Field name {name} does not carry the {expected} suffix")]
    SuffixMismatch { name: String, expected: String },

    #[error("Field is not a map: {0}")]
    NotAMap(String),

    #[error("Field not found: {0}")]
    FieldNotFound(usize),

    #[error("Path not found: {0}")]
    PathNotFound(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
