//! # dtx-explorer
//!
//! Data-shaping core of the cluster console for CRDT data types.
//!
//! - [`core`] - field kinds, field trees and the suffix classifier
//! - [`ops`] - operation documents and the operation builder
//! - [`client`] - fetch/update flows over a pluggable transport
//!
//! ## Example
//!
//! ```rust
//! use dtx_explorer::core::FieldTree;
//! use dtx_explorer::ops::{build_operation, DataTypeObject, DataTypeValue, Operand, OperationType};
//! use serde_json::json;
//!
//! let payload = json!({ "n_map": { "m_map": { "f_flag": true } } });
//! let tree = FieldTree::from_payload("k", payload.as_object().unwrap()).unwrap();
//! let m = tree.find_path("n_map.m_map").unwrap();
//! let f = tree.find_path("n_map.m_map.f_flag").unwrap();
//! let object = DataTypeObject::new("maps", "b", "k", DataTypeValue::Map(tree));
//!
//! let doc = build_operation(&object, Some(m), OperationType::RemoveField, Some(&Operand::Field(f))).unwrap();
//! assert_eq!(doc.encode().unwrap(), r#"{"update":{"n_map":{"update":{"m_map":{"remove":"f_flag"}}}}}"#);
//! ```

pub use dtx_client as client;
pub use dtx_core as core;
pub use dtx_ops as ops;
