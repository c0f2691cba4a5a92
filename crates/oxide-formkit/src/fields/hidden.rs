//! Hidden field type.

use std::any::Any;

use super::{derive_name, populate_value_attribute};
use crate::field::{FieldCore, FieldKind};
use crate::value::Values;

/// `<input type="hidden">`. Takes no part in tab order.
#[derive(Debug, Clone, Default)]
pub struct Hidden;

impl FieldKind for Hidden {
    fn type_token(&self) -> &str {
        "hidden"
    }

    fn init(&mut self, core: &mut FieldCore) {
        core.attributes.set("type", Some("hidden"));
        derive_name(core, "");
    }

    fn populate(&mut self, core: &mut FieldCore, values: &Values) {
        populate_value_attribute(core, values);
    }

    fn renders_label(&self) -> bool {
        false
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

    #[test]
    fn test_hidden_field() {
        let mut field = Field::new(
            Box::new(Hidden),
            "csrf_token",
            Some("Token"),
            &AttributeMap::new(),
            &OptionMap::new(),
            &AttributeMap::new(),
        );
        field.populate(&values([("csrf_token", "abc123")]));

        assert_eq!(
            field.render(),
            r#"<input type="hidden" name="csrf_token" value="abc123" />"#
        );
    }
}
