//! Text and password inputs.

use std::any::Any;

use super::{derive_name, populate_value_attribute};
use crate::field::{FieldCore, FieldKind};
use crate::value::Values;

/// Single-line `<input>`: `text` or `password`.
#[derive(Debug, Clone)]
pub struct Text {
    input_type: &'static str,
}

impl Default for Text {
    fn default() -> Self {
        Self { input_type: "text" }
    }
}

impl Text {
    /// Creates a text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a password input.
    pub fn password() -> Self {
        Self {
            input_type: "password",
        }
    }
}

impl FieldKind for Text {
    fn type_token(&self) -> &str {
        self.input_type
    }

    fn init(&mut self, core: &mut FieldCore) {
        core.attributes.set("type", Some(self.input_type));
        derive_name(core, "");
    }

    fn populate(&mut self, core: &mut FieldCore, values: &Values) {
        populate_value_attribute(core, values);
    }

    fn tab_stops(&self) -> usize {
        1
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::{AttributeMap, OptionMap};
    use crate::field::Field;
    use crate::value::values;

    fn field(kind: Text, attributes: &AttributeMap) -> Field {
        Field::new(
            Box::new(kind),
            "email",
            None,
            attributes,
            &OptionMap::new(),
            &AttributeMap::new(),
        )
    }

    #[test]
    fn test_type_cannot_be_overridden() {
        let field = field(Text::new(), &AttributeMap::new().with("type", "email"));
        assert_eq!(field.attribute("type"), Some("text"));
    }

    #[test]
    fn test_populate_copies_value() {
        let mut field = field(Text::new(), &AttributeMap::new());
        field.populate(&values([("email", "a@b.co"), ("other", "x")]));
        assert_eq!(
            field.render(),
            r#"<input type="text" name="email" value="a@b.co" />"#
        );
    }

    #[test]
    fn test_password() {
        let mut field = field(Text::password(), &AttributeMap::new());
        field.populate(&values([("email", "secret")]));
        assert_eq!(field.type_token(), "password");
        assert!(field.render().contains(r#"type="password""#));
        assert_eq!(field.attribute("value"), Some("secret"));
    }

    #[test]
    fn test_populate_ignores_missing_key() {
        let mut field = field(Text::new(), &AttributeMap::new().with("value", "keep"));
        field.populate(&values([("other", "x")]));
        assert_eq!(field.attribute("value"), Some("keep"));
    }
}
