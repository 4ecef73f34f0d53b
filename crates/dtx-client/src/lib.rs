//! Request layer for the data-type explorer.
//!
//! Wraps the classifier and the operation builder in the two calls the
//! console makes against the explorer API: fetch a data-type object, and post
//! an update operation for it.
//!
//! # Architecture
//!
//! - [`client`] - [`ExplorerClient`], fetch and update flows
//! - [`config`] - Client configuration and builder
//! - [`endpoint`] - Data-type endpoint paths and response decoding
//! - [`transport`] - Transport trait and the in-memory transport
//! - [`error`] - Error types

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod transport;

// Re-exports for convenience
pub use client::ExplorerClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use endpoint::{decode_object, DataTypePath};
pub use error::{ClientError, Result};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, MemoryTransport, Method, TransportError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::client::ExplorerClient;
    pub use crate::config::ClientConfig;
    pub use crate::error::ClientError;
    pub use crate::transport::{HttpTransport, MemoryTransport};
    pub use dtx_core::{FieldId, FieldTree, FieldType};
    pub use dtx_ops::{DataTypeObject, Operand, OperationDocument, OperationType};
}
