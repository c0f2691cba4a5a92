//! Submitted field values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A submitted value: a single string or a list of strings
/// (checkbox groups, multi-selects).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Scalar value.
    Text(String),
    /// Multi-valued field.
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the scalar value, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Returns the values as a list, coercing a scalar into a one-element list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::Text(s) => vec![s.clone()],
            Self::List(items) => items.clone(),
        }
    }

    /// Returns whether the value is an empty string or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.iter().map(|v| (*v).to_string()).collect())
    }
}

/// Submitted values keyed by field name, in submission order.
pub type Values = IndexMap<String, FieldValue>;

/// Builds a [`Values`] map from `(name, value)` pairs.
pub fn values<K, V, I>(pairs: I) -> Values
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_coerces_to_list() {
        let value = FieldValue::from("red");
        assert_eq!(value.to_list(), vec!["red".to_string()]);
        assert_eq!(value.as_text(), Some("red"));
    }

    #[test]
    fn test_empty() {
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(Vec::new()).is_empty());
        assert!(!FieldValue::from(["a"]).is_empty());
    }

    #[test]
    fn test_untagged_json() {
        let parsed: Values =
            serde_json::from_str(r#"{"name":"Ann","colors":["red","blue"]}"#).unwrap();
        assert_eq!(parsed.get("name"), Some(&FieldValue::from("Ann")));
        assert_eq!(parsed.get("colors"), Some(&FieldValue::from(["red", "blue"])));
    }

    #[test]
    fn test_values_helper() {
        let vals = values([("a", "1"), ("b", "2")]);
        let keys: Vec<&String> = vals.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
