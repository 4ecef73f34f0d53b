//! # dtx-core
//!
//! Field model for CRDT map objects held by the key-value cluster.
//!
//! This crate provides:
//! - Field kinds resolved from the field-name suffix (`_counter`, `_flag`,
//!   `_register`, `_set`, `_map`)
//! - An arena [`FieldTree`] holding every field record of one object, with
//!   parent and root links kept as handles
//! - The classifier turning a fetched map payload into that tree
//!
//! ## Example
//!
//! ```rust
//! use dtx_core::{FieldTree, FieldType};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "visits_counter": 3,
//!     "prefs_map": { "dark_flag": true }
//! });
//! let tree = FieldTree::from_payload("user_1", payload.as_object().unwrap()).unwrap();
//!
//! let dark = tree.find_path("prefs_map.dark_flag").unwrap();
//! assert_eq!(tree.get(dark).unwrap().field_type, FieldType::Flag);
//! ```

pub mod classify;
pub mod error;
pub mod field;
pub mod tree;

pub use error::{CoreError, Result};
pub use field::{Counter, FieldId, FieldRecord, FieldType, FieldValue, ParentRef};
pub use tree::{ClassifiedFieldSet, FieldTree};
