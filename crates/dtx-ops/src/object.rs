//! Data-type objects and the operation vocabulary.

use crate::error::OperationError;
use dtx_core::{Counter, FieldId, FieldTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// The data type a bucket type declares for its objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataTypeKind {
    Counter,
    Set,
    Map,
}

impl FromStr for DataTypeKind {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counter" => Ok(DataTypeKind::Counter),
            "set" => Ok(DataTypeKind::Set),
            "map" => Ok(DataTypeKind::Map),
            other => Err(OperationError::InvalidDataType(other.to_string())),
        }
    }
}

impl std::fmt::Display for DataTypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataTypeKind::Counter => write!(f, "counter"),
            DataTypeKind::Set => write!(f, "set"),
            DataTypeKind::Map => write!(f, "map"),
        }
    }
}

/// Mutations the console can request on a data-type object.
///
/// Wire names are the camel-case strings the console uses, e.g. `addElement`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationType {
    Increment,
    Decrement,
    AddElement,
    RemoveElement,
    AddField,
    EditField,
    RemoveField,
}

impl OperationType {
    pub fn name(&self) -> &'static str {
        match self {
            OperationType::Increment => "increment",
            OperationType::Decrement => "decrement",
            OperationType::AddElement => "addElement",
            OperationType::RemoveElement => "removeElement",
            OperationType::AddField => "addField",
            OperationType::EditField => "editField",
            OperationType::RemoveField => "removeField",
        }
    }
}

impl FromStr for OperationType {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increment" => Ok(OperationType::Increment),
            "decrement" => Ok(OperationType::Decrement),
            "addElement" => Ok(OperationType::AddElement),
            "removeElement" => Ok(OperationType::RemoveElement),
            "addField" => Ok(OperationType::AddField),
            "editField" => Ok(OperationType::EditField),
            "removeField" => Ok(OperationType::RemoveField),
            other => Err(OperationError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The argument of an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// A set element to add or remove.
    Element(String),
    /// A field record of the object's tree (added, edited or removed field).
    Field(FieldId),
}

/// The value held by a data-type object.
#[derive(Clone, Debug, PartialEq)]
pub enum DataTypeValue {
    Counter(Counter),
    Set(BTreeSet<String>),
    Map(FieldTree),
}

impl DataTypeValue {
    pub fn kind(&self) -> DataTypeKind {
        match self {
            DataTypeValue::Counter(_) => DataTypeKind::Counter,
            DataTypeValue::Set(_) => DataTypeKind::Set,
            DataTypeValue::Map(_) => DataTypeKind::Map,
        }
    }
}

/// One object stored under a key of a data-type bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct DataTypeObject {
    pub bucket_type: String,
    pub bucket: String,
    pub key: String,
    /// Data type declared by the bucket type's properties, as reported by the cluster.
    pub data_type: String,
    pub value: DataTypeValue,
}

impl DataTypeObject {
    pub fn new(
        bucket_type: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
        value: DataTypeValue,
    ) -> Self {
        Self {
            bucket_type: bucket_type.into(),
            bucket: bucket.into(),
            key: key.into(),
            data_type: value.kind().to_string(),
            value,
        }
    }

    /// Override the declared data type.
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    pub fn tree(&self) -> Option<&FieldTree> {
        match &self.value {
            DataTypeValue::Map(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn tree_mut(&mut self) -> Option<&mut FieldTree> {
        match &mut self.value {
            DataTypeValue::Map(tree) => Some(tree),
            _ => None,
        }
    }
}
