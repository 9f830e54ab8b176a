//! Ordered key/value metadata attached to documents and results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered `String -> Value` mapping with typed accessors for reserved keys.
///
/// Insertion order is preserved (serde_json's `preserve_order` feature).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Identifier of the document this one was derived from (e.g. a chunk's source document).
    pub const KEY_PARENT_ID: &'static str = "_parent_id";
    /// Original text the vector was computed from.
    pub const KEY_TEXT: &'static str = "_text";
    /// Where the content came from (path, URL, ...).
    pub const KEY_SOURCE: &'static str = "_source";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a value, returning the previous one for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        // shift_remove keeps the order of the remaining entries
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn has_parent_id(&self) -> bool {
        self.contains_key(Self::KEY_PARENT_ID)
    }

    /// Parent id as a string. Numeric ids are rendered to their decimal form.
    pub fn parent_id(&self) -> Option<String> {
        match self.get(Self::KEY_PARENT_ID)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn set_parent_id(&mut self, parent_id: impl Into<String>) {
        self.insert(Self::KEY_PARENT_ID, parent_id.into());
    }

    pub fn has_text(&self) -> bool {
        self.contains_key(Self::KEY_TEXT)
    }

    pub fn text(&self) -> Option<&str> {
        self.get(Self::KEY_TEXT).and_then(Value::as_str)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.insert(Self::KEY_TEXT, text.into());
    }

    pub fn has_source(&self) -> bool {
        self.contains_key(Self::KEY_SOURCE)
    }

    pub fn source(&self) -> Option<&str> {
        self.get(Self::KEY_SOURCE).and_then(Value::as_str)
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.insert(Self::KEY_SOURCE, source.into());
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Metadata(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Metadata(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
