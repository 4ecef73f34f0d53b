//! Field kinds and field records.
//!
//! A map payload names its fields with a kind suffix (`_counter`, `_flag`,
//! `_register`, `_set`, `_map`). The suffix is resolved once, when the field
//! record is built, into a closed [`FieldType`].

use crate::tree::ClassifiedFieldSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Handle of a field record inside a [`FieldTree`](crate::tree::FieldTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId(pub(crate) usize);

impl FieldId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a field inside a CRDT map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Counter,
    Flag,
    Register,
    Set,
    Map,
}

impl FieldType {
    /// Suffix match order. A name is expected to match at most one entry;
    /// when it matches more, the first one wins.
    pub const ALL: [FieldType; 5] = [
        FieldType::Counter,
        FieldType::Flag,
        FieldType::Register,
        FieldType::Set,
        FieldType::Map,
    ];

    /// The field-name suffix that selects this kind.
    pub fn suffix(&self) -> &'static str {
        match self {
            FieldType::Counter => "_counter",
            FieldType::Flag => "_flag",
            FieldType::Register => "_register",
            FieldType::Set => "_set",
            FieldType::Map => "_map",
        }
    }

    /// Name of the bucket this kind is grouped under in a classified set.
    pub fn bucket_name(&self) -> &'static str {
        match self {
            FieldType::Counter => "counters",
            FieldType::Flag => "flags",
            FieldType::Register => "registers",
            FieldType::Set => "sets",
            FieldType::Map => "maps",
        }
    }

    /// Resolve a field name to its kind by suffix.
    ///
    /// Returns `None` for names carrying none of the known suffixes.
    pub fn from_field_name(name: &str) -> Option<FieldType> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| name.ends_with(kind.suffix()))
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Counter => "counter",
            FieldType::Flag => "flag",
            FieldType::Register => "register",
            FieldType::Set => "set",
            FieldType::Map => "map",
        };
        write!(f, "{}", name)
    }
}

/// A counter value together with the step sizes the console applies to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub value: i64,
    pub increment_by: i64,
    pub decrement_by: i64,
}

impl Counter {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            increment_by: 1,
            decrement_by: 1,
        }
    }

    pub fn with_steps(mut self, increment_by: i64, decrement_by: i64) -> Self {
        self.increment_by = increment_by;
        self.decrement_by = decrement_by;
        self
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// The typed value of a field record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Counter(Counter),
    Flag(bool),
    Register(String),
    Set(BTreeSet<String>),
    Map(ClassifiedFieldSet),
}

impl FieldValue {
    /// The kind this value belongs to.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Counter(_) => FieldType::Counter,
            FieldValue::Flag(_) => FieldType::Flag,
            FieldValue::Register(_) => FieldType::Register,
            FieldValue::Set(_) => FieldType::Set,
            FieldValue::Map(_) => FieldType::Map,
        }
    }

    pub fn as_counter(&self) -> Option<&Counter> {
        match self {
            FieldValue::Counter(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_register(&self) -> Option<&str> {
        match self {
            FieldValue::Register(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            FieldValue::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ClassifiedFieldSet> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Where a field record sits relative to its enclosing map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentRef {
    /// The record is the top-level map itself.
    TopLevel,
    /// The record lives inside the given map record.
    Map(FieldId),
}

/// One named field inside a map, or the top-level map itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub name: String,
    pub field_type: FieldType,
    pub value: FieldValue,
    /// Top-level map of the tree this record belongs to.
    pub root: FieldId,
    pub parent: ParentRef,
}

impl FieldRecord {
    /// True for the top-level map record.
    pub fn is_top_level(&self) -> bool {
        self.parent == ParentRef::TopLevel
    }

    pub fn parent_id(&self) -> Option<FieldId> {
        match self.parent {
            ParentRef::TopLevel => None,
            ParentRef::Map(id) => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_resolution() {
        assert_eq!(FieldType::from_field_name("visits_counter"), Some(FieldType::Counter));
        assert_eq!(FieldType::from_field_name("enabled_flag"), Some(FieldType::Flag));
        assert_eq!(FieldType::from_field_name("name_register"), Some(FieldType::Register));
        assert_eq!(FieldType::from_field_name("tags_set"), Some(FieldType::Set));
        assert_eq!(FieldType::from_field_name("profile_map"), Some(FieldType::Map));
        assert_eq!(FieldType::from_field_name("plain"), None);
        assert_eq!(FieldType::from_field_name("counter"), None);
    }

    #[test]
    fn test_suffix_is_a_suffix() {
        // The kind word in the middle of a name does not count.
        assert_eq!(FieldType::from_field_name("set_of_things"), None);
        assert_eq!(FieldType::from_field_name("map_set"), Some(FieldType::Set));
    }

    #[test]
    fn test_counter_default_steps() {
        let counter = Counter::new(7);
        assert_eq!(counter.increment_by, 1);
        assert_eq!(counter.decrement_by, 1);

        let counter = counter.with_steps(5, 2);
        assert_eq!(counter.value, 7);
        assert_eq!(counter.increment_by, 5);
        assert_eq!(counter.decrement_by, 2);
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(FieldValue::Flag(true).field_type(), FieldType::Flag);
        assert_eq!(
            FieldValue::Map(ClassifiedFieldSet::default()).field_type(),
            FieldType::Map
        );
        assert_eq!(FieldValue::Register("x".into()).as_register(), Some("x"));
        assert!(FieldValue::Flag(false).as_counter().is_none());
    }
}
