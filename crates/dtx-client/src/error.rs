//! Error types for the request layer.

use crate::transport::TransportError;
use dtx_core::CoreError;
use dtx_ops::OperationError;
use thiserror::Error;

/// Errors returned by [`ExplorerClient`](crate::client::ExplorerClient).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Field(#[from] CoreError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Request to {url} failed with status {status}")]
    RequestFailed { status: u16, url: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
