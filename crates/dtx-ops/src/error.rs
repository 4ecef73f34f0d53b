//! Error types for operation building.

use dtx_core::CoreError;
use thiserror::Error;

/// Errors that can occur while building an update operation.
///
/// Any of these means no document was produced and nothing should be sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid data type: {0}")]
    InvalidDataType(String),

    #[error("Missing operand: {0}")]
    MissingOperand(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Field(#[from] CoreError),
}

impl From<serde_json::Error> for OperationError {
    fn from(err: serde_json::Error) -> Self {
        OperationError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;
