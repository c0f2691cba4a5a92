//! Declarative form configuration.

use serde::Deserialize;

use crate::attrs::{AttributeMap, OptionMap};
use crate::error::{FormError, Result};

/// Form and field defaults, usually loaded from JSON.
///
/// ```rust
/// use oxide_formkit::FormConfig;
///
/// let config = FormConfig::from_json(r#"{
///     "attributes": { "id": "signup" },
///     "field_wrapper_tag": "li",
///     "tab_indexes": true
/// }"#).unwrap();
///
/// assert_eq!(config.attributes.get("id"), Some("signup"));
/// assert!(config.render_errors);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// `<form>` attributes.
    pub attributes: AttributeMap,
    /// Form options (`render_tag`, `before`, ...).
    pub options: OptionMap,
    /// Attribute defaults for every field.
    pub field_attributes: AttributeMap,
    /// Option defaults for every field.
    pub field_options: OptionMap,
    /// Wrapper tag for every field.
    pub field_wrapper_tag: Option<String>,
    /// Wrapper attribute defaults for every field.
    pub field_wrapper_attributes: AttributeMap,
    /// Whether fields get sequential `tabindex` attributes.
    pub tab_indexes: bool,
    /// Whether fields render their errors.
    pub render_errors: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            attributes: AttributeMap::new(),
            options: OptionMap::new(),
            field_attributes: AttributeMap::new(),
            field_options: OptionMap::new(),
            field_wrapper_tag: None,
            field_wrapper_attributes: AttributeMap::new(),
            tab_indexes: false,
            render_errors: true,
        }
    }
}

impl FormConfig {
    /// Parses a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(FormError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorMap;
    use crate::form::Form;
    use crate::value::Values;

    #[test]
    fn test_defaults() {
        let config = FormConfig::from_json("{}").unwrap();
        assert_eq!(config, FormConfig::default());
        assert!(!config.tab_indexes);
        assert!(config.render_errors);
    }

    #[test]
    fn test_invalid_json() {
        let err = FormConfig::from_json("{\"tab_indexes\": 3}").unwrap_err();
        assert!(matches!(err, FormError::Config(_)));
    }

    #[test]
    fn test_form_from_config() {
        let config = FormConfig::from_json(
            r#"{
                "attributes": { "action": "/signup", "id": "signup" },
                "options": { "render_is_submitted_field": false },
                "field_attributes": { "class": "input" },
                "field_wrapper_tag": "p",
                "tab_indexes": true,
                "render_errors": false
            }"#,
        )
        .unwrap();

        let mut errors = ErrorMap::new();
        errors.add("email", "Email is too short");
        let mut form = Form::from_config(&config, Values::new(), errors);
        form.add_field(
            "text",
            "email",
            None,
            &AttributeMap::new(),
            &OptionMap::new(),
            &AttributeMap::new(),
        );

        assert!(form.tab_indexes_enabled());
        assert_eq!(
            form.render(),
            concat!(
                r#"<form action="/signup" method="post" id="signup">"#,
                r#"<p><input type="text" name="email" class="input" tabindex="1" /></p>"#,
                "</form>",
            )
        );
    }
}
