//! Attribute, option and CSS class cascades.
//!
//! Both maps keep insertion order. Overwriting a key keeps its original
//! position, so a variant's defaults decide where its attributes land in the
//! rendered tag.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::markup;

/// HTML attributes. A `None` value is never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap {
    attrs: IndexMap<String, Option<String>>,
}

impl AttributeMap {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map whose keys are all present but unset.
    pub fn with_keys(keys: &[&str]) -> Self {
        Self {
            attrs: keys.iter().map(|k| ((*k).to_string(), None)).collect(),
        }
    }

    /// Sets an attribute, `None` removes it from output.
    pub fn set<V: Into<String>>(&mut self, key: impl Into<String>, value: Option<V>) {
        self.attrs.insert(key.into(), value.map(Into::into));
    }

    /// Builder method to set an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), Some(value.into()));
        self
    }

    /// Gets an attribute value, `None` when missing or unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Option::as_deref)
    }

    /// Removes an attribute, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) {
        self.attrs.shift_remove(key);
    }

    /// Returns whether the key is present, even if unset.
    pub fn contains_key(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Merges `other` into this map.
    ///
    /// With `override_existing` the incoming values win on conflict,
    /// otherwise existing values are kept. New keys are appended either way.
    pub fn merge(&mut self, other: &Self, override_existing: bool) {
        for (key, value) in &other.attrs {
            if override_existing || !self.attrs.contains_key(key) {
                self.attrs.insert(key.clone(), value.clone());
            }
        }
    }

    /// Returns `overrides` layered on top of `self`.
    #[must_use]
    pub fn layered(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        merged.merge(overrides, true);
        merged
    }

    /// Iterates set attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// Returns the number of keys, set or not.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns whether the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Renders set attributes as ` key="value"` pairs.
    pub fn to_html(&self) -> String {
        markup::attributes(self.iter())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attrs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

/// Behavioral options of a field or form (`required`, `before`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionMap {
    options: IndexMap<String, Value>,
}

impl OptionMap {
    /// Creates an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(key.into(), value.into());
    }

    /// Builder method to set an option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Gets the raw option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Gets a string option.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    /// Gets a string option or an empty string.
    pub fn str_or_empty(&self, key: &str) -> &str {
        self.get_str(key).unwrap_or("")
    }

    /// Gets a boolean option, treating anything but `true` as false.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.options.get(key), Some(Value::Bool(true)))
    }

    /// Merges `other` into this map, see [`AttributeMap::merge`].
    pub fn merge(&mut self, other: &Self, override_existing: bool) {
        for (key, value) in &other.options {
            if override_existing || !self.options.contains_key(key) {
                self.options.insert(key.clone(), value.clone());
            }
        }
    }

    /// Returns `overrides` layered on top of `self`.
    #[must_use]
    pub fn layered(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        merged.merge(overrides, true);
        merged
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            options: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered set of CSS classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: IndexSet<String>,
}

impl ClassList {
    /// Creates an empty class list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class. Empty names and duplicates are ignored.
    pub fn add(&mut self, class: &str) {
        let class = class.trim();
        if !class.is_empty() {
            self.classes.insert(class.to_string());
        }
    }

    /// Removes a class, keeping the order of the rest.
    pub fn remove(&mut self, class: &str) {
        self.classes.shift_remove(class.trim());
    }

    /// Returns whether the class is tracked.
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Combines the classes of a `class` attribute string with the tracked
    /// ones, attribute classes first. Returns `None` when nothing is left.
    pub fn resolve(&self, attribute: Option<&str>) -> Option<String> {
        let mut merged: IndexSet<&str> = attribute
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default();
        merged.extend(self.classes.iter().map(String::as_str));

        if merged.is_empty() {
            None
        } else {
            Some(merged.into_iter().collect::<Vec<_>>().join(" "))
        }
    }
}
