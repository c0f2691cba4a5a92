//! Session storage used to carry form state across a redirect.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FormError, Result};

/// A key-value session backend holding JSON values.
pub trait SessionStore {
    /// Returns the raw value stored under `key`.
    fn get_value(&self, key: &str) -> Option<&Value>;

    /// Stores a value, replacing any previous one.
    fn set_value(&mut self, key: &str, value: Value);

    /// Removes a value.
    fn remove_value(&mut self, key: &str);
}

/// In-memory session, serializable as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemorySession {
    data: IndexMap<String, Value>,
}

impl MemorySession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a session from its JSON encoding.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(FormError::Session)
    }

    /// Encodes the session as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(FormError::Session)
    }

    /// Gets a typed value, `None` when missing or of another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Sets a typed value.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(FormError::Session)?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) {
        self.data.shift_remove(key);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get_value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    fn remove_value(&mut self, key: &str) {
        self.remove(key);
    }
}
