//! # Object Values
//!
//! String-keyed map that keeps keys in the order they were first inserted,
//! so `{ to: [2, 2], tag: 'yo' }` executes, prints and serializes in source
//! order.
//!
//! Objects in KCL programs are small literals, so lookups scan the entries.

use crate::value::Value;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Insertion-ordered map from property name to value.
///
/// # Examples
///
/// ```rust
/// use kcl_eval::{ObjectMap, Value};
///
/// let mut object = ObjectMap::new();
/// object.insert("to", Value::Number(1.0));
/// object.insert("tag", Value::from("yo"));
/// let keys: Vec<_> = object.keys().collect();
/// assert_eq!(keys, ["to", "tag"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMap {
    entries: Vec<(String, Value)>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Sets `key` to `value`.
    ///
    /// A repeated key keeps its first position and takes the new value.
    ///
    /// ## Returns
    ///
    /// The value previously stored under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ObjectMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut object = ObjectMap::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

// =============================================================================
// SERDE
// =============================================================================

impl Serialize for ObjectMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct ObjectVisitor;

impl<'de> Visitor<'de> for ObjectVisitor {
    type Value = ObjectMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of property names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ObjectMap, A::Error> {
        let mut object = ObjectMap::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            object.insert(key, value);
        }
        Ok(object)
    }
}

impl<'de> Deserialize<'de> for ObjectMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ObjectVisitor)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_key_keeps_first_position() {
        let mut object: ObjectMap = [("b", Value::Number(1.0)), ("a", Value::Number(2.0))]
            .into_iter()
            .collect();
        assert_eq!(object.insert("b", Value::Number(3.0)), Some(Value::Number(1.0)));
        assert_eq!(object.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(object.get("b"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_remove() {
        let mut object: ObjectMap = [("z", Value::None), ("y", Value::Bool(true))].into_iter().collect();
        assert_eq!(object.remove("z"), Some(Value::None));
        assert_eq!(object.remove("z"), None);
        assert_eq!(object.len(), 1);
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let object: ObjectMap = [("to", Value::Number(2.0)), ("tag", Value::from("yo"))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&object).unwrap();
        assert_eq!(
            json,
            r#"{"to":{"type":"Number","value":2.0},"tag":{"type":"String","value":"yo"}}"#
        );
        let back: ObjectMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), ["to", "tag"]);
    }
}
