//! Operation documents sent to the data-type update endpoint.
//!
//! Each document is a single-key JSON object:
//!
//! ```text
//! {"increment": 3}
//! {"remove": "old_flag"}
//! {"update": {"prefs_map": {"update": {"theme_register": "dark"}}}}
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// An update operation for one data-type object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationDocument {
    Increment(i64),
    Decrement(i64),
    Add(String),
    Remove(String),
    Update(BTreeMap<String, UpdateValue>),
}

/// The value stored under a field name inside an `update` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdateValue {
    /// A nested operation on the named field.
    Operation(Box<OperationDocument>),
    /// A plain value written to the named field.
    Value(Value),
}

impl OperationDocument {
    /// `{"update": {name: operation}}`
    pub fn update(name: impl Into<String>, operation: OperationDocument) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(name.into(), UpdateValue::Operation(Box::new(operation)));
        OperationDocument::Update(fields)
    }

    /// `{"update": {name: value}}`
    pub fn update_value(name: impl Into<String>, value: Value) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(name.into(), UpdateValue::Value(value));
        OperationDocument::Update(fields)
    }

    /// Number of `update` levels wrapping a nested operation.
    pub fn nesting(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let OperationDocument::Update(fields) = current {
            match fields.values().next() {
                Some(UpdateValue::Operation(inner)) if fields.len() == 1 => {
                    depth += 1;
                    current = inner.as_ref();
                }
                _ => break,
            }
        }
        depth
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Compact JSON text, as posted to the backend.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
