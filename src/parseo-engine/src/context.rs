//! Evaluation context
//!
//! Named data sources supplied fresh for each evaluation.

use indexmap::IndexMap;
use parseo_shared::Value;

/// Insertion-ordered mapping from context key to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: IndexMap<String, Value>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, Value)> for Context {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        self.values
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}
