//! Read-only property access over context data.
//!
//! The evaluator never walks host data directly; it asks a [`Gettable`] for
//! one key at a time, after the sandbox has vetted the key.

use crate::value::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Name(String),
    Index(usize),
}

impl PropertyKey {
    pub fn name(name: impl Into<String>) -> Self {
        PropertyKey::Name(name.into())
    }

    /// The key as a field name; indices render as decimal digits.
    pub fn as_name(&self) -> Cow<'_, str> {
        match self {
            PropertyKey::Name(name) => Cow::Borrowed(name),
            PropertyKey::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// The key as a sequence index. Names qualify when they are the
    /// canonical decimal form of an index, so `"1"` does but `"01"` does not.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PropertyKey::Index(i) => Some(*i),
            PropertyKey::Name(name) => name
                .parse::<usize>()
                .ok()
                .filter(|i| i.to_string() == *name),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_name())
    }
}

/// Anything an expression can read properties from: the evaluation context
/// and every intermediate value.
///
/// Implementations return `None` for absent keys; the evaluator turns that
/// into `undefined`.
pub trait Gettable {
    fn get(&self, key: &PropertyKey) -> Option<Value>;
}

fn sequence_length(key: &PropertyKey) -> bool {
    matches!(key, PropertyKey::Name(name) if name == "length")
}

impl Gettable for Value {
    fn get(&self, key: &PropertyKey) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(key.as_name().as_ref()).cloned(),
            Value::Array(items) => {
                if sequence_length(key) {
                    return Some(Value::from(items.len()));
                }
                key.as_index().and_then(|i| items.get(i)).cloned()
            }
            Value::String(s) => {
                if sequence_length(key) {
                    return Some(Value::from(s.chars().count()));
                }
                key.as_index()
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::String(c.to_string()))
            }
            _ => None,
        }
    }
}

impl Gettable for serde_json::Value {
    fn get(&self, key: &PropertyKey) -> Option<Value> {
        match self {
            serde_json::Value::Object(map) => map.get(key.as_name().as_ref()).map(Value::from),
            serde_json::Value::Array(items) => {
                if sequence_length(key) {
                    return Some(Value::from(items.len()));
                }
                key.as_index().and_then(|i| items.get(i)).map(Value::from)
            }
            serde_json::Value::String(s) => Value::String(s.clone()).get(key),
            _ => None,
        }
    }
}

impl<S: std::hash::BuildHasher> Gettable for HashMap<String, Value, S> {
    fn get(&self, key: &PropertyKey) -> Option<Value> {
        HashMap::get(self, key.as_name().as_ref()).cloned()
    }
}

impl Gettable for BTreeMap<String, Value> {
    fn get(&self, key: &PropertyKey) -> Option<Value> {
        BTreeMap::get(self, key.as_name().as_ref()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_index_names() {
        assert_eq!(PropertyKey::name("1").as_index(), Some(1));
        assert_eq!(PropertyKey::name("01").as_index(), None);
        assert_eq!(PropertyKey::name("-1").as_index(), None);
        assert_eq!(PropertyKey::Index(3).as_name(), "3");
    }

    #[test]
    fn arrays_and_strings_expose_length_and_indices() {
        let items = Value::from(vec![Value::from(1), Value::from(2)]);
        assert_eq!(items.get(&PropertyKey::name("length")), Some(Value::from(2)));
        assert_eq!(items.get(&PropertyKey::Index(1)), Some(Value::from(2)));
        assert_eq!(items.get(&PropertyKey::Index(5)), None);

        let text = Value::from("héllo");
        assert_eq!(text.get(&PropertyKey::name("length")), Some(Value::from(5)));
        assert_eq!(text.get(&PropertyKey::Index(1)), Some(Value::from("é")));
        assert_eq!(Value::from(3).get(&PropertyKey::name("length")), None);
    }

    #[test]
    fn json_context_reads_convert_lazily() {
        let ctx = json!({"user": {"name": "Ada"}, "items": [1, 2, 3]});
        // serde_json::Value has an inherent `get`, so name the trait.
        assert_eq!(
            Gettable::get(&ctx, &PropertyKey::name("user")),
            Some(Value::from(&json!({"name": "Ada"})))
        );
        assert_eq!(Gettable::get(&ctx, &PropertyKey::name("missing")), None);
        let items = Gettable::get(&ctx, &PropertyKey::name("items")).unwrap();
        assert_eq!(items.get(&PropertyKey::name("length")), Some(Value::from(3)));
    }

    #[test]
    fn maps_are_contexts() {
        let mut map = HashMap::new();
        map.insert("price".to_string(), Value::from(19.99));
        assert_eq!(Gettable::get(&map, &PropertyKey::name("price")), Some(Value::from(19.99)));

        let mut tree = BTreeMap::new();
        tree.insert("0".to_string(), Value::Null);
        assert_eq!(Gettable::get(&tree, &PropertyKey::Index(0)), Some(Value::Null));
    }
}
