//! # dtx-ops
//!
//! Update-operation building for counter, set and map data types.
//!
//! This crate provides:
//! - [`OperationDocument`], the serde model of the JSON body posted to the
//!   per-key data-type endpoint
//! - The operation vocabulary (`increment`, `addElement`, `removeField`, ...)
//!   and the data-type kinds a bucket type can declare
//! - The builder: leaf operations plus wrapping through enclosing maps
//!
//! Building is pure: nothing here logs, retries or touches the network.
//!
//! ## Example
//!
//! ```rust
//! use dtx_core::FieldTree;
//! use dtx_ops::{build_operation, DataTypeObject, DataTypeValue, OperationType};
//! use serde_json::json;
//!
//! let payload = json!({ "stats_map": { "hits_counter": 10 } });
//! let tree = FieldTree::from_payload("page_1", payload.as_object().unwrap()).unwrap();
//! let hits = tree.find_path("stats_map.hits_counter").unwrap();
//! let object = DataTypeObject::new("maps", "pages", "page_1", DataTypeValue::Map(tree));
//!
//! let doc = build_operation(&object, Some(hits), OperationType::Increment, None).unwrap();
//! assert_eq!(doc.encode().unwrap(), r#"{"update":{"stats_map":{"increment":1}}}"#);
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod object;

pub use builder::{
    build_named_operation, build_operation, counter_operation, map_operation, set_operation,
    wrap_through_ancestors,
};
pub use document::{OperationDocument, UpdateValue};
pub use error::{OperationError, Result};
pub use object::{DataTypeKind, DataTypeObject, DataTypeValue, Operand, OperationType};
