//! Error collection.

use indexmap::IndexMap;
use serde_json::Value;

/// Rendered messages per resolved field key, in insertion order.
pub type ErrorMap = IndexMap<String, Vec<String>>;

/// Collects failure messages for one validation run.
///
/// Keys keep the order of their first failure; messages for a key keep the
/// order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorCollector {
    errors: ErrorMap,
}

impl ErrorCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for `key`.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(key.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.errors.get(key).map(Vec::as_slice)
    }

    /// First message recorded for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Returns true if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of keys with at least one message.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Total number of messages across all keys.
    pub fn message_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Iterates `(key, messages)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &ErrorMap {
        &self.errors
    }

    /// Consumes the collector, returning the map.
    pub fn into_map(self) -> ErrorMap {
        self.errors
    }

    /// JSON object form: `{ key: [messages] }`.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.errors
                .iter()
                .map(|(key, messages)| {
                    (
                        key.clone(),
                        Value::Array(messages.iter().cloned().map(Value::String).collect()),
                    )
                })
                .collect(),
        )
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}
