//! Field tree - arena of field records for one classified map object.
//!
//! Every record of a classified object lives in a single [`FieldTree`].
//! Records point at their enclosing map and at the top-level map through
//! [`FieldId`] handles, so a map and its nested fields never own each other.

use crate::error::{CoreError, Result};
use crate::field::{Counter, FieldId, FieldRecord, FieldType, FieldValue, ParentRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The direct fields of one map, grouped by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedFieldSet {
    pub counters: BTreeMap<String, FieldId>,
    pub flags: BTreeMap<String, FieldId>,
    pub registers: BTreeMap<String, FieldId>,
    pub sets: BTreeMap<String, FieldId>,
    pub maps: BTreeMap<String, FieldId>,
}

impl ClassifiedFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bucket holding fields of the given kind.
    pub fn bucket(&self, kind: FieldType) -> &BTreeMap<String, FieldId> {
        match kind {
            FieldType::Counter => &self.counters,
            FieldType::Flag => &self.flags,
            FieldType::Register => &self.registers,
            FieldType::Set => &self.sets,
            FieldType::Map => &self.maps,
        }
    }

    fn bucket_mut(&mut self, kind: FieldType) -> &mut BTreeMap<String, FieldId> {
        match kind {
            FieldType::Counter => &mut self.counters,
            FieldType::Flag => &mut self.flags,
            FieldType::Register => &mut self.registers,
            FieldType::Set => &mut self.sets,
            FieldType::Map => &mut self.maps,
        }
    }

    /// Insert a field into the bucket for `kind`, replacing any same-named entry.
    pub fn insert(&mut self, kind: FieldType, name: impl Into<String>, id: FieldId) -> Option<FieldId> {
        self.bucket_mut(kind).insert(name.into(), id)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldId> {
        let kind = FieldType::from_field_name(name)?;
        self.bucket_mut(kind).remove(name)
    }

    /// Look a field up by name. The name's suffix selects the bucket.
    pub fn get(&self, name: &str) -> Option<FieldId> {
        let kind = FieldType::from_field_name(name)?;
        self.bucket(kind).get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All `(name, id)` pairs, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldId)> + '_ {
        FieldType::ALL
            .iter()
            .flat_map(move |kind| self.bucket(*kind).iter())
    }

    pub fn len(&self) -> usize {
        FieldType::ALL.iter().map(|kind| self.bucket(*kind).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Arena owning every field record of one classified map object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldTree {
    records: Vec<FieldRecord>,
    root: FieldId,
}

impl FieldTree {
    /// Create a tree holding only an empty top-level map named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let root = FieldId(0);
        let record = FieldRecord {
            name: name.into(),
            field_type: FieldType::Map,
            value: FieldValue::Map(ClassifiedFieldSet::default()),
            root,
            parent: ParentRef::TopLevel,
        };
        Self {
            records: vec![record],
            root,
        }
    }

    /// Build a tree from a fetched map payload.
    pub fn from_payload(name: impl Into<String>, payload: &Map<String, Value>) -> Result<Self> {
        let mut tree = Self::new(name);
        let root = tree.root;
        let fields = tree.classify(root, root, payload)?;
        tree.record_mut(root)?.value = FieldValue::Map(fields);
        Ok(tree)
    }

    pub fn root(&self) -> FieldId {
        self.root
    }

    pub fn get(&self, id: FieldId) -> Result<&FieldRecord> {
        self.records.get(id.0).ok_or(CoreError::FieldNotFound(id.0))
    }

    pub(crate) fn record_mut(&mut self, id: FieldId) -> Result<&mut FieldRecord> {
        self.records.get_mut(id.0).ok_or(CoreError::FieldNotFound(id.0))
    }

    pub(crate) fn push(&mut self, record: FieldRecord) -> FieldId {
        let id = FieldId(self.records.len());
        self.records.push(record);
        id
    }

    /// Number of records in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The classified fields of a map record.
    pub fn fields_of(&self, map: FieldId) -> Result<&ClassifiedFieldSet> {
        let record = self.get(map)?;
        record
            .value
            .as_map()
            .ok_or_else(|| CoreError::NotAMap(record.name.clone()))
    }

    fn fields_of_mut(&mut self, map: FieldId) -> Result<&mut ClassifiedFieldSet> {
        let record = self.record_mut(map)?;
        match &mut record.value {
            FieldValue::Map(fields) => Ok(fields),
            _ => Err(CoreError::NotAMap(record.name.clone())),
        }
    }

    /// The top-level fields.
    ///
    /// Fails only for a tree deserialized with a missing or non-map root.
    pub fn root_fields(&self) -> Result<&ClassifiedFieldSet> {
        self.fields_of(self.root)
    }

    /// Direct child of a map by name.
    pub fn child(&self, map: FieldId, name: &str) -> Result<Option<FieldId>> {
        Ok(self.fields_of(map)?.get(name))
    }

    /// Resolve a dot-separated path of field names from the root
    /// (e.g. `"settings_map.profile_map.visits_counter"`). The empty path is the root.
    pub fn find_path(&self, path: &str) -> Result<FieldId> {
        let mut current = self.root;
        if path.is_empty() {
            return Ok(current);
        }
        for segment in path.split('.') {
            let fields = self
                .fields_of(current)
                .map_err(|_| CoreError::PathNotFound(path.to_string()))?;
            current = fields
                .get(segment)
                .ok_or_else(|| CoreError::PathNotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// Dot-separated path of a record, excluding the top-level map name.
    pub fn path_of(&self, id: FieldId) -> Result<String> {
        let mut names = Vec::new();
        let mut current = self.get(id)?;
        while let ParentRef::Map(parent) = current.parent {
            names.push(current.name.as_str());
            current = self.get(parent)?;
        }
        names.reverse();
        Ok(names.join("."))
    }

    /// Number of nested maps between a record and the top-level map.
    pub fn depth(&self, id: FieldId) -> Result<usize> {
        let mut depth = 0;
        let mut current = self.get(id)?;
        while let ParentRef::Map(parent) = current.parent {
            let parent_record = self.get(parent)?;
            if parent_record.is_top_level() {
                break;
            }
            depth += 1;
            current = parent_record;
        }
        Ok(depth)
    }

    /// Attach a new field under `parent`, decoding `raw` by the name's suffix.
    ///
    /// A field of the same name is replaced; its old record stays in the
    /// arena but is no longer reachable from the root.
    pub fn insert_field(&mut self, parent: FieldId, name: &str, raw: &Value) -> Result<FieldId> {
        let kind = FieldType::from_field_name(name).ok_or_else(|| CoreError::SuffixMismatch {
            name: name.to_string(),
            expected: "known kind".to_string(),
        })?;
        // Fail before decoding anything into the arena.
        self.fields_of(parent)?;
        let root = self.get(parent)?.root;
        let id = self.build_field(root, parent, name, kind, raw)?;
        self.fields_of_mut(parent)?.insert(kind, name, id);
        Ok(id)
    }

    /// Replace the value of an existing field, decoding `raw` by its kind.
    pub fn set_value(&mut self, id: FieldId, raw: &Value) -> Result<()> {
        let record = self.get(id)?;
        let (name, kind, root) = (record.name.clone(), record.field_type, record.root);
        let value = match kind {
            FieldType::Map => {
                let nested = raw.as_object().ok_or_else(|| invalid(&name, "object"))?;
                FieldValue::Map(self.classify(root, id, nested)?)
            }
            FieldType::Counter => {
                let steps = self.get(id)?.value.as_counter().copied().unwrap_or_default();
                let value = decode_scalar(&name, kind, raw)?;
                match value {
                    FieldValue::Counter(c) => {
                        FieldValue::Counter(c.with_steps(steps.increment_by, steps.decrement_by))
                    }
                    other => other,
                }
            }
            _ => decode_scalar(&name, kind, raw)?,
        };
        self.record_mut(id)?.value = value;
        Ok(())
    }

    /// Detach a field from its enclosing map.
    pub fn remove_field(&mut self, id: FieldId) -> Result<()> {
        let record = self.get(id)?;
        let name = record.name.clone();
        match record.parent {
            ParentRef::TopLevel => Err(CoreError::NotAMap(name)),
            ParentRef::Map(parent) => {
                self.fields_of_mut(parent)?.remove(&name);
                Ok(())
            }
        }
    }

    /// Set the increment/decrement steps of a counter field.
    pub fn set_counter_step(&mut self, id: FieldId, increment_by: i64, decrement_by: i64) -> Result<()> {
        let record = self.record_mut(id)?;
        match &mut record.value {
            FieldValue::Counter(counter) => {
                counter.increment_by = increment_by;
                counter.decrement_by = decrement_by;
                Ok(())
            }
            _ => Err(invalid(&record.name, "counter")),
        }
    }

    /// Rebuild the raw JSON value of a record, as the backend would send it.
    pub fn value_json(&self, id: FieldId) -> Result<Value> {
        let record = self.get(id)?;
        let value = match &record.value {
            FieldValue::Counter(c) => Value::from(c.value),
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::Register(s) => Value::String(s.clone()),
            FieldValue::Set(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            FieldValue::Map(fields) => {
                let mut object = Map::new();
                for (name, child) in fields.iter() {
                    object.insert(name.clone(), self.value_json(*child)?);
                }
                Value::Object(object)
            }
        };
        Ok(value)
    }

    /// Rebuild the whole top-level payload.
    pub fn to_payload(&self) -> Result<Value> {
        self.value_json(self.root)
    }

    /// Records reachable from the root, depth first.
    pub fn reachable(&self) -> Vec<FieldId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Ok(fields) = self.fields_of(id) {
                stack.extend(fields.iter().map(|(_, child)| *child));
            }
        }
        out
    }
}

pub(crate) fn invalid(field: &str, expected: &str) -> CoreError {
    CoreError::InvalidValue {
        field: field.to_string(),
        expected: expected.to_string(),
    }
}

/// Decode a non-map raw value for a field of the given kind.
pub(crate) fn decode_scalar(name: &str, kind: FieldType, raw: &Value) -> Result<FieldValue> {
    let value = match kind {
        FieldType::Counter => {
            FieldValue::Counter(Counter::new(raw.as_i64().ok_or_else(|| invalid(name, "integer"))?))
        }
        FieldType::Flag => FieldValue::Flag(raw.as_bool().ok_or_else(|| invalid(name, "boolean"))?),
        FieldType::Register => {
            FieldValue::Register(raw.as_str().ok_or_else(|| invalid(name, "string"))?.to_string())
        }
        FieldType::Set => {
            let items = raw.as_array().ok_or_else(|| invalid(name, "array of strings"))?;
            let elements = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(name, "array of strings"))
                })
                .collect::<Result<_>>()?;
            FieldValue::Set(elements)
        }
        FieldType::Map => return Err(invalid(name, "scalar")),
    };
    Ok(value)
}
