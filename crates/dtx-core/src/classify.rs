//! Field classifier.
//!
//! Splits the fields of a raw map payload into counters, flags, registers,
//! sets and nested maps according to the field-name suffix, building one
//! record per field in the [`FieldTree`] arena.

use crate::error::Result;
use crate::field::{FieldId, FieldRecord, FieldType, FieldValue, ParentRef};
use crate::tree::{decode_scalar, invalid, ClassifiedFieldSet, FieldTree};
use serde_json::{Map, Value};

impl FieldTree {
    /// Classify the fields of `payload` as the direct children of `parent`.
    ///
    /// Every record built here, nested maps included, registers `root` as its
    /// top-level map. Keys with no known suffix are left out of every bucket.
    /// The returned set is not attached to `parent`; the caller stores it.
    pub fn classify(
        &mut self,
        root: FieldId,
        parent: FieldId,
        payload: &Map<String, Value>,
    ) -> Result<ClassifiedFieldSet> {
        let mut fields = ClassifiedFieldSet::new();
        for (name, raw) in payload {
            let Some(kind) = FieldType::from_field_name(name) else {
                continue;
            };
            let id = self.build_field(root, parent, name, kind, raw)?;
            fields.insert(kind, name.clone(), id);
        }
        Ok(fields)
    }

    pub(crate) fn build_field(
        &mut self,
        root: FieldId,
        parent: FieldId,
        name: &str,
        kind: FieldType,
        raw: &Value,
    ) -> Result<FieldId> {
        if kind != FieldType::Map {
            let value = decode_scalar(name, kind, raw)?;
            return Ok(self.push(FieldRecord {
                name: name.to_string(),
                field_type: kind,
                value,
                root,
                parent: ParentRef::Map(parent),
            }));
        }

        let nested = raw.as_object().ok_or_else(|| invalid(name, "object"))?;
        // The map record must exist before its children can point at it.
        let id = self.push(FieldRecord {
            name: name.to_string(),
            field_type: FieldType::Map,
            value: FieldValue::Map(ClassifiedFieldSet::new()),
            root,
            parent: ParentRef::Map(parent),
        });
        let fields = self.classify(root, id, nested)?;
        self.record_mut(id)?.value = FieldValue::Map(fields);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CoreError;
    use crate::field::{FieldType, ParentRef};
    use crate::tree::FieldTree;
    use serde_json::{json, Map, Value};

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_classify_buckets() {
        let tree = FieldTree::from_payload(
            "obj",
            &payload(json!({
                "a_counter": 5,
                "b_set": ["x", "y"],
                "c_map": { "d_flag": true },
                "e_register": "hello",
                "f_flag": false
            })),
        )
        .unwrap();

        let fields = tree.root_fields().unwrap();
        assert_eq!(fields.counters.keys().collect::<Vec<_>>(), vec!["a_counter"]);
        assert_eq!(fields.sets.keys().collect::<Vec<_>>(), vec!["b_set"]);
        assert_eq!(fields.maps.keys().collect::<Vec<_>>(), vec!["c_map"]);
        assert_eq!(fields.registers.keys().collect::<Vec<_>>(), vec!["e_register"]);
        assert_eq!(fields.flags.keys().collect::<Vec<_>>(), vec!["f_flag"]);

        let c_map = fields.maps["c_map"];
        let nested = tree.fields_of(c_map).unwrap();
        assert_eq!(nested.flags.keys().collect::<Vec<_>>(), vec!["d_flag"]);
        assert_eq!(nested.len(), 1);
    }

    #[test]
    fn test_classify_values() {
        let tree = FieldTree::from_payload(
            "obj",
            &payload(json!({
                "a_counter": -3,
                "b_set": ["y", "x", "y"],
                "e_register": "hello",
                "f_flag": true
            })),
        )
        .unwrap();

        let value = |path: &str| tree.get(tree.find_path(path).unwrap()).unwrap().value.clone();
        assert_eq!(value("a_counter").as_counter().unwrap().value, -3);
        assert_eq!(
            value("b_set").as_set().unwrap().iter().collect::<Vec<_>>(),
            vec!["x", "y"]
        );
        assert_eq!(value("e_register").as_register(), Some("hello"));
        assert_eq!(value("f_flag").as_flag(), Some(true));
    }

    #[test]
    fn test_unmatched_keys_are_dropped() {
        let tree = FieldTree::from_payload(
            "obj",
            &payload(json!({
                "plain": 1,
                "counter": 2,
                "nested_map": { "loose": "x", "ok_flag": true }
            })),
        )
        .unwrap();

        assert_eq!(tree.root_fields().unwrap().len(), 1);
        let nested = tree.find_path("nested_map").unwrap();
        assert_eq!(tree.fields_of(nested).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_payload() {
        let tree = FieldTree::from_payload("obj", &Map::new()).unwrap();
        assert!(tree.root_fields().unwrap().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_parent_and_root_links() {
        let tree = FieldTree::from_payload(
            "obj",
            &payload(json!({
                "outer_map": { "inner_map": { "hits_counter": 9 } }
            })),
        )
        .unwrap();

        let outer = tree.find_path("outer_map").unwrap();
        let inner = tree.find_path("outer_map.inner_map").unwrap();
        let hits = tree.find_path("outer_map.inner_map.hits_counter").unwrap();

        assert_eq!(tree.get(outer).unwrap().parent, ParentRef::Map(tree.root()));
        assert_eq!(tree.get(inner).unwrap().parent, ParentRef::Map(outer));
        assert_eq!(tree.get(hits).unwrap().parent, ParentRef::Map(inner));
        for id in [outer, inner, hits] {
            assert_eq!(tree.get(id).unwrap().root, tree.root());
        }
        assert_eq!(tree.get(inner).unwrap().field_type, FieldType::Map);
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            json!({ "a_counter": "five" }),
            json!({ "a_counter": 1.5 }),
            json!({ "a_flag": "true" }),
            json!({ "a_register": 3 }),
            json!({ "a_set": "x" }),
            json!({ "a_set": ["x", 1] }),
            json!({ "a_map": [1, 2] }),
            json!({ "a_map": { "b_counter": null } }),
        ];
        for case in cases {
            let err = FieldTree::from_payload("obj", &payload(case.clone())).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidValue { .. }),
                "unexpected error for {}: {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_classify_into_existing_map() {
        let mut tree = FieldTree::from_payload("obj", &payload(json!({ "m_map": {} }))).unwrap();
        let root = tree.root();
        let m = tree.find_path("m_map").unwrap();

        let fields = tree
            .classify(root, m, &payload(json!({ "x_counter": 1, "y_set": [] })))
            .unwrap();
        assert_eq!(fields.len(), 2);
        let x = fields.counters["x_counter"];
        assert_eq!(tree.get(x).unwrap().parent, ParentRef::Map(m));
        assert_eq!(tree.get(x).unwrap().root, root);
    }
}
