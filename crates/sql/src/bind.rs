//! Named values bound into a query.

use indexmap::IndexMap;

use crate::value::Value;

/// Placeholder-name to value mapping, in insertion order.
///
/// Keys are unique; rebinding an existing key overwrites its value
/// (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindSet {
    values: IndexMap<String, Value>,
}

impl BindSet {
    pub fn new() -> Self {
        BindSet::default()
    }

    /// Bind one value under a placeholder name.
    pub fn bind(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Merge another bind set in; colliding keys take the other's value.
    pub fn merge(&mut self, other: &BindSet) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Remove the given keys.
    pub fn unbind(&mut self, keys: &[&str]) {
        for key in keys {
            self.values.shift_remove(*key);
        }
    }

    /// Remove every bound value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}
