//! Textarea field type.

use std::any::Any;

use super::derive_name;
use crate::field::{FieldCore, FieldKind, RenderState};
use crate::markup;
use crate::value::{FieldValue, Values};

/// `<textarea>`; the value is rendered as element content.
#[derive(Debug, Clone, Default)]
pub struct Textarea {
    value: String,
}

impl Textarea {
    /// Creates an empty textarea.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current content.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FieldKind for Textarea {
    fn type_token(&self) -> &str {
        "textarea"
    }

    fn init(&mut self, core: &mut FieldCore) {
        core.attributes.set::<String>("type", None);
        derive_name(core, "");
    }

    fn populate(&mut self, core: &mut FieldCore, values: &Values) {
        if let Some(value) = values.get(&core.field_name) {
            self.value = match value {
                FieldValue::Text(s) => s.clone(),
                FieldValue::List(items) => items.join("\n"),
            };
        }
    }

    fn tab_stops(&self) -> usize {
        1
    }

    fn render_element(&self, core: &FieldCore, state: &RenderState) -> String {
        let element = format!(
            "{}{}{}",
            markup::open_tag("textarea", state.attributes.iter()),
            markup::html_escape(&self.value),
            markup::close_tag("textarea")
        );
        core.wrap_element(&element)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
