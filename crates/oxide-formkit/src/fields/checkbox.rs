//! Single checkbox field type.

use std::any::Any;

use super::derive_name;
use crate::field::{FieldCore, FieldKind};
use crate::value::Values;

/// A lone `<input type="checkbox">`.
///
/// For several boxes sharing one name use [`super::ChoiceGroup`].
#[derive(Debug, Clone, Default)]
pub struct Checkbox;

impl FieldKind for Checkbox {
    fn type_token(&self) -> &str {
        "checkbox"
    }

    fn init(&mut self, core: &mut FieldCore) {
        core.attributes.set("type", Some("checkbox"));
        derive_name(core, "");
        if core.attributes.get("value").map_or(true, str::is_empty) {
            core.attributes.set("value", Some("on"));
        }
    }

    /// Checks the box when its name was submitted, whatever the value.
    fn populate(&mut self, core: &mut FieldCore, values: &Values) {
        if values.contains_key(&core.field_name) {
            core.attributes.set("checked", Some("checked"));
        }
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
