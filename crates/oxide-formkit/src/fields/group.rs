//! Checkbox and radio groups sharing one `name="x[]"`.

use std::any::Any;

use super::derive_name;
use crate::attrs::OptionMap;
use crate::field::{FieldCore, FieldKind, RenderState};
use crate::markup;
use crate::value::Values;

/// Input type of every member of a [`ChoiceGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Checkbox,
    Radio,
}

impl GroupKind {
    fn input_type(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
        }
    }

    fn token(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox_group",
            Self::Radio => "radio_group",
        }
    }
}

/// One member of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A group of checkboxes or radio buttons, each with its own label.
///
/// The shared field label is never rendered. Every member takes one tab
/// index from the block the group claims, in member order.
#[derive(Debug, Clone)]
pub struct ChoiceGroup {
    kind: GroupKind,
    choices: Vec<Choice>,
    checked: Vec<String>,
}

impl ChoiceGroup {
    /// Creates an empty checkbox group.
    pub fn checkboxes() -> Self {
        Self::new(GroupKind::Checkbox)
    }

    /// Creates an empty radio group.
    pub fn radios() -> Self {
        Self::new(GroupKind::Radio)
    }

    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            choices: Vec::new(),
            checked: Vec::new(),
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Appends a member.
    pub fn add_choice(&mut self, value: impl Into<String>, label: impl Into<String>) -> &mut Self {
        self.choices.push(Choice::new(value, label));
        self
    }

    /// Appends several members.
    pub fn add_choices(&mut self, choices: impl IntoIterator<Item = Choice>) -> &mut Self {
        self.choices.extend(choices);
        self
    }

    /// Replaces all members.
    pub fn set_choices(&mut self, choices: impl IntoIterator<Item = Choice>) -> &mut Self {
        self.choices.clear();
        self.add_choices(choices)
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Returns whether `value` was among the submitted values.
    pub fn is_checked(&self, value: &str) -> bool {
        self.checked.iter().any(|v| v == value)
    }

    fn render_choice(
        &self,
        core: &FieldCore,
        state: &RenderState,
        choice: &Choice,
        tab_index: Option<u32>,
    ) -> String {
        let mut attributes = state.attributes.clone();
        if let Some(index) = tab_index {
            attributes.set("tabindex", Some(index.to_string()));
        }
        let id = attributes.get("id").map(|id| format!("{id}_{}", choice.value));
        attributes.set("id", id.clone());
        attributes.remove("value");
        attributes.set("value", Some(choice.value.as_str()));
        if self.is_checked(&choice.value) {
            attributes.set("checked", Some("checked"));
        }

        let label = core.render_label(&choice.label, id.as_deref());
        let label_after = core.options.get_str("label_position") == Some("after");

        let mut html = String::new();
        html.push_str(core.options.str_or_empty("before"));
        if !label_after {
            html.push_str(&label);
        }
        html.push_str(&markup::input(attributes.iter()));
        if label_after {
            html.push_str(&label);
        }
        html.push_str(core.options.str_or_empty("after"));
        html
    }
}

impl FieldKind for ChoiceGroup {
    fn type_token(&self) -> &str {
        self.kind.token()
    }

    fn default_options(&self, options: &mut OptionMap) {
        options.set("group_before", "");
        options.set("group_after", "");
        options.set("label_position", "before");
    }

    fn init(&mut self, core: &mut FieldCore) {
        core.attributes.set("type", Some(self.kind.input_type()));
        core.attributes.set::<String>("value", None);
        derive_name(core, "[]");
    }

    fn populate(&mut self, core: &mut FieldCore, values: &Values) {
        if let Some(value) = values.get(&core.field_name) {
            self.checked = value.to_list();
        }
    }

    fn tab_stops(&self) -> usize {
        self.choices.len()
    }

    fn renders_label(&self) -> bool {
        false
    }

    fn render_element(&self, core: &FieldCore, state: &RenderState) -> String {
        let mut html = core.options.str_or_empty("group_before").to_string();
        for (i, choice) in self.choices.iter().enumerate() {
            let tab_index = state
                .tab_start
                .and_then(|start| u32::try_from(i).ok().map(|i| start + i));
            html.push_str(&self.render_choice(core, state, choice, tab_index));
        }
        html.push_str(core.options.str_or_empty("group_after"));
        html
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
    use crate::attrs::AttributeMap;
    use crate::field::Field;
    use crate::value::values;

    fn colors(group: ChoiceGroup, attributes: &AttributeMap, options: &OptionMap) -> Field {
        let mut field = Field::new(
            Box::new(group),
            "colors",
            Some("Colors"),
            attributes,
            options,
            &AttributeMap::new(),
        );
        if let Some(group) = field.variant_mut::<ChoiceGroup>() {
            group.add_choice("red", "Red").add_choice("blue", "Blue");
        }
        field
    }

    #[test]
    fn test_checkbox_group_render() {
        let mut field = colors(
            ChoiceGroup::checkboxes(),
            &AttributeMap::new().with("id", "c"),
            &OptionMap::new(),
        );
        field.populate(&values([("colors", vec!["blue"])]));

        assert_eq!(field.type_token(), "checkbox_group");
        assert_eq!(
            field.render(),
            concat!(
                r#"<label for="c_red">Red</label>"#,
                r#"<input type="checkbox" name="colors[]" id="c_red" value="red" />"#,
                r#"<label for="c_blue">Blue</label>"#,
                r#"<input type="checkbox" name="colors[]" id="c_blue" value="blue" checked="checked" />"#,
            )
        );
    }

    #[test]
    fn test_radio_group_label_after() {
        let options = OptionMap::new()
            .with("label_position", "after")
            .with("group_before", "<ul>")
            .with("group_after", "</ul>")
            .with("before", "<li>")
            .with("after", "</li>");
        let mut field = colors(ChoiceGroup::radios(), &AttributeMap::new(), &options);
        field.populate(&values([("colors", "red")]));

        assert_eq!(
            field.render(),
            concat!(
                "<ul>",
                r#"<li><input type="radio" name="colors[]" value="red" checked="checked" /><label>Red</label></li>"#,
                r#"<li><input type="radio" name="colors[]" value="blue" /><label>Blue</label></li>"#,
                "</ul>",
            )
        );
    }

    #[test]
    fn test_population_is_order_independent() {
        let mut field = colors(ChoiceGroup::checkboxes(), &AttributeMap::new(), &OptionMap::new());
        field.populate(&values([("colors", vec!["blue", "red"])]));

        let group = field.variant::<ChoiceGroup>().unwrap();
        assert!(group.is_checked("red"));
        assert!(group.is_checked("blue"));
        assert_eq!(group.choices().len(), 2);
    }

    #[test]
    fn test_set_choices_replaces() {
        let mut group = ChoiceGroup::checkboxes();
        group.add_choice("a", "A");
        group.set_choices([Choice::new("b", "B"), Choice::new("c", "C")]);
        assert_eq!(group.choices()[0], Choice::new("b", "B"));
        assert_eq!(group.tab_stops(), 2);
    }
}
