//! Submit and button inputs.

use std::any::Any;

use super::derive_name;
use crate::field::{FieldCore, FieldKind};

/// `<input type="submit">` or `<input type="button">`.
///
/// Buttons never take submitted values.
#[derive(Debug, Clone)]
pub struct Button {
    input_type: &'static str,
}

impl Button {
    /// Creates a submit button.
    pub fn submit() -> Self {
        Self {
            input_type: "submit",
        }
    }

    /// Creates a plain button.
    pub fn button() -> Self {
        Self {
            input_type: "button",
        }
    }
}

impl FieldKind for Button {
    fn type_token(&self) -> &str {
        self.input_type
    }

    fn init(&mut self, core: &mut FieldCore) {
        core.attributes.set("type", Some(self.input_type));
        derive_name(core, "");
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
