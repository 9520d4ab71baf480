//! Per-transaction session data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-serializable key/value state a plugin carries between calls.
///
/// This is the only mutable state in the SDK. It belongs to a single
/// transaction and is never shared between invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(Map<String, Value>);

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Replaces the contents with `values`, key by key.
    ///
    /// Keys absent from `values` are deleted rather than kept.
    pub fn assign(&mut self, values: Map<String, Value>) {
        self.0.retain(|key, _| values.contains_key(key));
        for (key, value) in values {
            self.0.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
