//! Property-based tests for operation building
//!
//! These tests verify the nesting guarantees of map operations:
//!  - A field N nested maps deep gets exactly N `update` levels
//!  - The outermost level names the outermost map
//!  - Unknown operation names never produce a document

use dtx_core::FieldTree;
use dtx_ops::{
    build_named_operation, build_operation, wrap_through_ancestors, DataTypeObject, DataTypeValue,
    Operand, OperationDocument, OperationError, OperationType, UpdateValue,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// A map object whose single counter sits under `depth` nested maps.
fn nested_object(depth: usize, increment_by: i64) -> (DataTypeObject, Vec<String>) {
    let names: Vec<String> = (0..depth).map(|level| format!("l{}_map", level)).collect();

    let mut payload = json!({ "hits_counter": 0 });
    for name in names.iter().rev() {
        let mut outer = Map::new();
        outer.insert(name.clone(), payload);
        payload = Value::Object(outer);
    }

    let mut tree = FieldTree::from_payload("obj", payload.as_object().unwrap()).unwrap();
    let mut path = names.clone();
    path.push("hits_counter".to_string());
    let hits = tree.find_path(&path.join(".")).unwrap();
    tree.set_counter_step(hits, increment_by, 1).unwrap();

    (
        DataTypeObject::new("maps", "b", "obj", DataTypeValue::Map(tree)),
        names,
    )
}

/// Names along the `update` chain, outermost first.
fn update_chain(doc: &OperationDocument) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = doc;
    while let OperationDocument::Update(fields) = current {
        match fields.iter().next() {
            Some((name, UpdateValue::Operation(inner))) => {
                names.push(name.clone());
                current = inner.as_ref();
            }
            _ => break,
        }
    }
    names
}

proptest! {
    #[test]
    fn increment_nests_once_per_map(depth in 0usize..8, by in 1i64..50) {
        let (object, names) = nested_object(depth, by);
        let tree = object.tree().unwrap();
        let mut path = names.clone();
        path.push("hits_counter".to_string());
        let hits = tree.find_path(&path.join(".")).unwrap();

        let doc = build_operation(&object, Some(hits), OperationType::Increment, None).unwrap();
        prop_assert_eq!(doc.nesting(), depth);
        prop_assert_eq!(update_chain(&doc), names);
        prop_assert_eq!(doc.to_json().unwrap().to_string().matches("increment").count(), 1);
    }

    #[test]
    fn remove_field_nests_from_removed_field(depth in 1usize..8) {
        let (object, names) = nested_object(depth, 1);
        let tree = object.tree().unwrap();
        let holder = tree.find_path(&names.join(".")).unwrap();
        let hits = tree.child(holder, "hits_counter").unwrap().unwrap();

        let doc = build_operation(
            &object,
            Some(holder),
            OperationType::RemoveField,
            Some(&Operand::Field(hits)),
        )
        .unwrap();
        // The removed field sits `depth` maps below the top level.
        prop_assert_eq!(doc.nesting(), depth);
        prop_assert_eq!(update_chain(&doc), names);
    }

    #[test]
    fn add_field_nests_from_new_field(depth in 0usize..8, flag in any::<bool>()) {
        let (mut object, names) = nested_object(depth, 1);
        let tree = object.tree_mut().unwrap();
        let holder = tree.find_path(&names.join(".")).unwrap();
        let added = tree.insert_field(holder, "new_flag", &json!(flag)).unwrap();

        let doc = build_operation(
            &object,
            Some(holder),
            OperationType::AddField,
            Some(&Operand::Field(added)),
        )
        .unwrap();
        prop_assert_eq!(doc.nesting(), depth);
        prop_assert_eq!(update_chain(&doc), names);
        let tail = format!(r#"{{"update":{{"new_flag":{}}}}}{}"#, flag, "}}".repeat(depth));
        let encoded = doc.encode().unwrap();
        prop_assert!(encoded.ends_with(&tail));
    }

    #[test]
    fn wrapping_is_identity_at_top_level(by in -100i64..100) {
        let (object, _) = nested_object(0, 1);
        let tree = object.tree().unwrap();
        let hits = tree.find_path("hits_counter").unwrap();
        let leaf = OperationDocument::Decrement(by);
        prop_assert_eq!(wrap_through_ancestors(tree, hits, leaf.clone()).unwrap(), leaf);
    }

    #[test]
    fn unknown_operation_names_are_rejected(name in "[a-zA-Z]{1,12}") {
        prop_assume!(name.parse::<OperationType>().is_err());
        let (object, _) = nested_object(1, 1);
        let result = build_named_operation(&object, None, &name, None);
        prop_assert_eq!(result, Err(OperationError::UnsupportedOperation(name.clone())));
    }
}
