//! Operation builder.
//!
//! Turns a requested mutation into the document the data-type update
//! endpoint expects. Counters and sets take their leaf operation as is. Map
//! fields get one `update` level per nested map between the field and the
//! top-level map:
//!
//! ```text
//! top-level map
//! └── settings_map
//!     └── profile_map
//!         └── visits_counter   editField(1)
//!
//! {"update": {"settings_map": {"update": {"profile_map": {"update": {"visits_counter": 1}}}}}}
//! ```

use crate::document::OperationDocument;
use crate::error::{OperationError, Result};
use crate::object::{DataTypeKind, DataTypeObject, DataTypeValue, Operand, OperationType};
use dtx_core::{Counter, FieldId, FieldRecord, FieldTree, FieldType, ParentRef};

/// Build the update document for `operation` on `object`.
///
/// For map objects `target` selects the field to operate on; `None` means the
/// top-level map. Counter and set objects ignore `target`.
pub fn build_operation(
    object: &DataTypeObject,
    target: Option<FieldId>,
    operation: OperationType,
    operand: Option<&Operand>,
) -> Result<OperationDocument> {
    let kind: DataTypeKind = object.data_type.parse()?;
    match (kind, &object.value) {
        (DataTypeKind::Counter, DataTypeValue::Counter(counter)) => {
            counter_operation(counter, operation)
        }
        (DataTypeKind::Set, DataTypeValue::Set(_)) => set_operation(operation, operand),
        (DataTypeKind::Map, DataTypeValue::Map(tree)) => {
            map_operation(tree, target.unwrap_or_else(|| tree.root()), operation, operand)
        }
        (kind, value) => Err(OperationError::InvalidDataType(format!(
            "{} bucket holds a {} value",
            kind,
            value.kind()
        ))),
    }
}

/// Same as [`build_operation`], with the operation given by its wire name.
pub fn build_named_operation(
    object: &DataTypeObject,
    target: Option<FieldId>,
    operation: &str,
    operand: Option<&Operand>,
) -> Result<OperationDocument> {
    build_operation(object, target, operation.parse()?, operand)
}

/// Leaf operation for a counter.
pub fn counter_operation(counter: &Counter, operation: OperationType) -> Result<OperationDocument> {
    match operation {
        OperationType::Increment => Ok(OperationDocument::Increment(counter.increment_by)),
        OperationType::Decrement => Ok(OperationDocument::Decrement(counter.decrement_by)),
        other => Err(OperationError::UnsupportedOperation(format!(
            "{} on a counter",
            other
        ))),
    }
}

/// Leaf operation for a set.
pub fn set_operation(operation: OperationType, operand: Option<&Operand>) -> Result<OperationDocument> {
    let make: fn(String) -> OperationDocument = match operation {
        OperationType::AddElement => OperationDocument::Add,
        OperationType::RemoveElement => OperationDocument::Remove,
        other => {
            return Err(OperationError::UnsupportedOperation(format!(
                "{} on a set",
                other
            )))
        }
    };
    match operand {
        Some(Operand::Element(element)) => Ok(make(element.clone())),
        _ => Err(OperationError::MissingOperand(format!(
            "{} requires an element",
            operation
        ))),
    }
}

/// Operation on a field of a map object, wrapped through its enclosing maps.
pub fn map_operation(
    tree: &FieldTree,
    target: FieldId,
    operation: OperationType,
    operand: Option<&Operand>,
) -> Result<OperationDocument> {
    let record = tree.get(target)?;
    let (leaf, holder) = match operation {
        OperationType::Increment | OperationType::Decrement => {
            let counter = record
                .value
                .as_counter()
                .ok_or_else(|| wrong_field(operation, record))?;
            (counter_operation(counter, operation)?, target)
        }
        OperationType::AddElement | OperationType::RemoveElement => {
            if record.field_type != FieldType::Set {
                return Err(wrong_field(operation, record));
            }
            (set_operation(operation, operand)?, target)
        }
        // Field operations wrap from the operand, so the map holding it is
        // always named even when `target` is that map.
        OperationType::AddField | OperationType::EditField => {
            let field = field_operand(operation, operand)?;
            let name = tree.get(field)?.name.clone();
            (OperationDocument::update_value(name, tree.value_json(field)?), field)
        }
        OperationType::RemoveField => {
            let field = field_operand(operation, operand)?;
            let name = tree.get(field)?.name.clone();
            (OperationDocument::Remove(name), field)
        }
    };
    wrap_through_ancestors(tree, holder, leaf)
}

/// Wrap `operation` in one `update` level per nested map above `field`.
///
/// The walk stops at the first ancestor that is the top-level map, so a field
/// sitting directly in the top-level map gets its operation back unchanged.
pub fn wrap_through_ancestors(
    tree: &FieldTree,
    field: FieldId,
    operation: OperationDocument,
) -> Result<OperationDocument> {
    let mut operation = operation;
    let mut current = tree.get(field)?;
    while let ParentRef::Map(parent_id) = current.parent {
        let parent = tree.get(parent_id)?;
        if parent.is_top_level() {
            break;
        }
        operation = OperationDocument::update(parent.name.clone(), operation);
        current = parent;
    }
    Ok(operation)
}

fn field_operand(operation: OperationType, operand: Option<&Operand>) -> Result<FieldId> {
    match operand {
        Some(Operand::Field(id)) => Ok(*id),
        _ => Err(OperationError::MissingOperand(format!(
            "{} requires a field",
            operation
        ))),
    }
}

fn wrong_field(operation: OperationType, record: &FieldRecord) -> OperationError {
    OperationError::UnsupportedOperation(format!(
        "{} on {} field {}",
        operation, record.field_type, record.name
    ))
}
