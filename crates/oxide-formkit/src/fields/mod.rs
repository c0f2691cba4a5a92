//! Built-in field variants.

mod button;
mod checkbox;
mod group;
mod hidden;
mod select;
mod text;
mod textarea;

pub use button::Button;
pub use checkbox::Checkbox;
pub use group::{Choice, ChoiceGroup, GroupKind};
pub use hidden::Hidden;
pub use select::{Select, SelectOption, SortOrder};
pub use text::Text;
pub use textarea::Textarea;

use crate::field::FieldCore;
use crate::value::{FieldValue, Values};

/// Copies the field's submitted value into its `value` attribute.
///
/// List values are joined with commas.
fn populate_value_attribute(core: &mut FieldCore, values: &Values) {
    if let Some(value) = values.get(&core.field_name) {
        let value = match value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(","),
        };
        core.attributes.set("value", Some(value));
    }
}

/// Sets the `name` attribute from the field name, `None` when it is empty.
fn derive_name(core: &mut FieldCore, suffix: &str) {
    let name = (!core.field_name.is_empty()).then(|| format!("{}{suffix}", core.field_name));
    core.attributes.set("name", name);
}
