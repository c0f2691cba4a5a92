//! Error types for forms.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Form toolkit errors.
///
/// Validation failures never surface here; they are collected as messages
/// in an [`ErrorMap`].
#[derive(Debug, Error)]
pub enum FormError {
    /// A named validation rule is not registered.
    #[error("unknown validation rule: {0}")]
    UnknownRule(String),

    /// A pattern supplied to `matches_pattern` does not compile.
    #[error("invalid pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Session payload could not be encoded.
    #[error("session data error: {0}")]
    Session(#[source] serde_json::Error),

    /// Form configuration could not be parsed.
    #[error("failed to parse form config: {0}")]
    Config(#[source] serde_json::Error),
}

/// Ordered collection of error messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap {
    errors: IndexMap<String, Vec<String>>,
}

impl ErrorMap {
    /// Creates a new empty ErrorMap.
    pub fn new() -> Self {
        Self {
            errors: IndexMap::new(),
        }
    }

    /// Adds an error for a field, creating its list on first use.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Replaces all errors of a field.
    pub fn set(&mut self, field: impl Into<String>, messages: Vec<String>) {
        self.errors.insert(field.into(), messages);
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns errors for a specific field.
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    /// Returns whether a field has an entry.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Iterates fields and their messages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Returns all errors as a flat list.
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |msg| (field.as_str(), msg.as_str()))
            })
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl std::fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, messages) in &self.errors {
            for message in messages {
                writeln!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_creates_list_lazily() {
        let mut errors = ErrorMap::new();
        assert!(errors.is_empty());

        errors.add("email", "Email is too short");
        errors.add("email", "Email has no @ symbol");
        errors.add("name", "This field cannot be empty");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email").map(Vec::len), Some(2));
        assert_eq!(errors.all_errors().len(), 3);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut errors = ErrorMap::new();
        errors.add("zeta", "z");
        errors.add("alpha", "a");

        let fields: Vec<&str> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_display() {
        let mut errors = ErrorMap::new();
        errors.add("name", "Required");
        assert_eq!(errors.to_string(), "name: Required\n");
    }

    #[test]
    fn test_error_messages() {
        let err = FormError::UnknownRule("is_even".to_string());
        assert_eq!(err.to_string(), "unknown validation rule: is_even");
    }
}
