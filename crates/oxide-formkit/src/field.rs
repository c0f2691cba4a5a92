//! The shared field contract and render pipeline.
//!
//! A [`Field`] is split in two: a [`FieldCore`] holding the state every
//! variant shares (attributes, options, wrapper, errors, the form handle) and
//! a boxed [`FieldKind`] holding the variant itself. The kind receives the
//! core at each hook, so a variant can rewrite attributes while its own state
//! stays private.

use std::any::Any;
use std::rc::{Rc, Weak};

use crate::attrs::{AttributeMap, ClassList, OptionMap};
use crate::form::FormContext;
use crate::markup;
use crate::value::Values;

/// Where a field renders its error box relative to its wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPosition {
    /// Before the wrapper's opening tag.
    TopOutside,
    /// Right after the wrapper's opening tag.
    TopInside,
    /// After the element, inside the wrapper.
    BottomInside,
    /// After the wrapper's closing tag.
    BottomOutside,
}

impl ErrorPosition {
    /// Parses the `error_render_position` option.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "top_outside" => Some(Self::TopOutside),
            "top_inside" => Some(Self::TopInside),
            "bottom_inside" => Some(Self::BottomInside),
            "bottom_outside" => Some(Self::BottomOutside),
            _ => None,
        }
    }

    /// Returns the option string for this position.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopOutside => "top_outside",
            Self::TopInside => "top_inside",
            Self::BottomInside => "bottom_inside",
            Self::BottomOutside => "bottom_outside",
        }
    }
}

/// Per-render state computed by the pre-render hook.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// Element attributes with classes normalized and tab index applied.
    pub attributes: AttributeMap,
    /// Wrapper attributes with classes normalized.
    pub wrapper_attributes: AttributeMap,
    /// First tab index claimed from the form, if any.
    pub tab_start: Option<u32>,
}

/// A concrete field variant.
///
/// Every hook has a default matching a plain `<input>` with no value
/// handling, so a variant only overrides what differs.
pub trait FieldKind: Any {
    /// Registry token of this variant.
    fn type_token(&self) -> &str;

    /// Adds variant-specific default options before call-site options apply.
    fn default_options(&self, _options: &mut OptionMap) {}

    /// Fixes up attributes after the cascades are merged.
    fn init(&mut self, _core: &mut FieldCore) {}

    /// Copies submitted values into the field.
    fn populate(&mut self, _core: &mut FieldCore, _values: &Values) {}

    /// Number of tab indices the field claims per render.
    fn tab_stops(&self) -> usize {
        0
    }

    /// Whether the shared `<label>` is rendered before the element.
    fn renders_label(&self) -> bool {
        true
    }

    /// Renders the element itself.
    fn render_element(&self, core: &FieldCore, state: &RenderState) -> String {
        core.wrap_element(&markup::input(state.attributes.iter()))
    }

    /// Hook called after the field's output is assembled.
    fn post_render(&self, _core: &FieldCore, _html: &mut String) {}

    /// Upcast for typed access to the variant.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed access to the variant.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// State shared by every field variant.
#[derive(Debug, Clone)]
pub struct FieldCore {
    /// Field name used to derive the `name` attribute.
    pub field_name: String,
    /// Label text, no `<label>` is rendered when `None`.
    pub label: Option<String>,
    /// Element attributes.
    pub attributes: AttributeMap,
    /// Tracked element classes.
    pub classes: ClassList,
    /// Behavioral options.
    pub options: OptionMap,
    /// Wrapper tag, no wrapper is rendered when `None`.
    pub wrapper_tag: Option<String>,
    /// Wrapper attributes.
    pub wrapper_attributes: AttributeMap,
    /// Tracked wrapper classes.
    pub wrapper_classes: ClassList,
    /// Error messages to display.
    pub errors: Vec<String>,
    /// Whether errors are rendered at all.
    pub render_errors: bool,
    form: Weak<FormContext>,
}

impl FieldCore {
    /// Returns the owning form's shared context if the form is still alive.
    pub fn form(&self) -> Option<Rc<FormContext>> {
        self.form.upgrade()
    }

    /// Surrounds element markup with the `before`/`after` options.
    pub fn wrap_element(&self, element: &str) -> String {
        format!(
            "{}{element}{}",
            self.options.str_or_empty("before"),
            self.options.str_or_empty("after")
        )
    }

    /// Renders a `<label>` with the `label_*` options around it.
    pub fn render_label(&self, text: &str, for_id: Option<&str>) -> String {
        let for_attr = for_id
            .map(|id| markup::attributes([("for", id)].into_iter()))
            .unwrap_or_default();

        format!(
            "{}<label{for_attr}>{}{}{}</label>{}",
            self.options.str_or_empty("label_before"),
            self.options.str_or_empty("label_before_inner"),
            markup::html_escape(text),
            self.options.str_or_empty("label_after_inner"),
            self.options.str_or_empty("label_after"),
        )
    }
}

/// Default element attributes shared by all variants.
const DEFAULT_ATTRIBUTES: [&str; 5] = ["type", "name", "class", "id", "value"];

/// Default wrapper attributes shared by all variants.
const DEFAULT_WRAPPER_ATTRIBUTES: [&str; 2] = ["id", "class"];

fn default_options() -> OptionMap {
    OptionMap::new()
        .with("required", false)
        .with("required_class", "field_required")
        .with("before", "")
        .with("after", "")
        .with("label_before", "")
        .with("label_before_inner", "")
        .with("label_after_inner", "")
        .with("label_after", "")
        .with("error_render_position", ErrorPosition::BottomInside.as_str())
        .with("error_box_class", "field_error")
}

/// A form field: shared state plus one variant.
pub struct Field {
    core: FieldCore,
    kind: Box<dyn FieldKind>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("type", &self.kind.type_token())
            .field("field_name", &self.core.field_name)
            .field("label", &self.core.label)
            .field("errors", &self.core.errors)
            .finish_non_exhaustive()
    }
}

impl Field {
    /// Creates a field, layering each map over the variant's defaults.
    pub fn new(
        mut kind: Box<dyn FieldKind>,
        field_name: impl Into<String>,
        label: Option<&str>,
        attributes: &AttributeMap,
        options: &OptionMap,
        wrapper_attributes: &AttributeMap,
    ) -> Self {
        let mut base_attributes = AttributeMap::with_keys(&DEFAULT_ATTRIBUTES);
        base_attributes.set("type", Some("text"));

        let mut base_options = default_options();
        kind.default_options(&mut base_options);

        let mut core = FieldCore {
            field_name: field_name.into(),
            label: label.map(str::to_string),
            attributes: base_attributes.layered(attributes),
            classes: ClassList::new(),
            options: base_options.layered(options),
            wrapper_tag: None,
            wrapper_attributes: AttributeMap::with_keys(&DEFAULT_WRAPPER_ATTRIBUTES)
                .layered(wrapper_attributes),
            wrapper_classes: ClassList::new(),
            errors: Vec::new(),
            render_errors: true,
            form: Weak::new(),
        };

        if core.options.get_bool("required") {
            let required_class = core.options.str_or_empty("required_class").to_string();
            core.wrapper_classes.add(&required_class);
        }

        kind.init(&mut core);

        Self { core, kind }
    }

    /// Returns the registry token of the variant.
    pub fn type_token(&self) -> &str {
        self.kind.type_token()
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.core.field_name
    }

    /// Returns the shared state.
    pub fn core(&self) -> &FieldCore {
        &self.core
    }

    /// Returns the shared state mutably.
    pub fn core_mut(&mut self) -> &mut FieldCore {
        &mut self.core
    }

    /// Returns the variant if it is a `T`.
    pub fn variant<T: FieldKind>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Returns the variant mutably if it is a `T`.
    pub fn variant_mut<T: FieldKind>(&mut self) -> Option<&mut T> {
        self.kind.as_any_mut().downcast_mut::<T>()
    }

    /// Binds the field to its owning form.
    pub(crate) fn bind_form(&mut self, form: &Rc<FormContext>) {
        self.core.form = Rc::downgrade(form);
    }

    /// Returns whether the field is bound to a live form.
    pub fn has_form(&self) -> bool {
        self.core.form().is_some()
    }

    /// Returns an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.core.attributes.get(name)
    }

    /// Returns all element attributes.
    pub fn attributes(&self) -> &AttributeMap {
        &self.core.attributes
    }

    /// Returns all options.
    pub fn options(&self) -> &OptionMap {
        &self.core.options
    }

    /// Returns the wrapper attributes.
    pub fn wrapper_attributes(&self) -> &AttributeMap {
        &self.core.wrapper_attributes
    }

    /// Sets an element attribute, `None` omits it from output.
    pub fn set_attribute<V: Into<String>>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        self.core.attributes.set(name, value);
        self
    }

    /// Sets an option.
    pub fn set_option(&mut self, name: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.core.options.set(name, value);
        self
    }

    /// Merges element attributes, see [`AttributeMap::merge`].
    pub fn set_attributes(
        &mut self,
        attributes: &AttributeMap,
        override_existing: bool,
    ) -> &mut Self {
        self.core.attributes.merge(attributes, override_existing);
        self
    }

    /// Merges options, see [`AttributeMap::merge`].
    pub fn set_options(&mut self, options: &OptionMap, override_existing: bool) -> &mut Self {
        self.core.options.merge(options, override_existing);
        self
    }

    /// Merges wrapper attributes, see [`AttributeMap::merge`].
    pub fn set_wrapper_attributes(
        &mut self,
        attributes: &AttributeMap,
        override_existing: bool,
    ) -> &mut Self {
        self.core.wrapper_attributes.merge(attributes, override_existing);
        self
    }

    /// Sets the wrapper tag and merges its attributes.
    pub fn set_wrapper(&mut self, tag: Option<&str>, attributes: &AttributeMap) -> &mut Self {
        self.core.wrapper_tag = tag.map(str::to_string);
        self.set_wrapper_attributes(attributes, true)
    }

    /// Sets or clears the `disabled` attribute.
    pub fn disabled(&mut self, disabled: bool) -> &mut Self {
        self.core
            .attributes
            .set("disabled", disabled.then_some("disabled"));
        self
    }

    /// Turns error rendering off (or back on).
    pub fn disable_errors(&mut self, disable: bool) -> &mut Self {
        self.core.render_errors = !disable;
        self
    }

    /// Adds a CSS class to the element.
    pub fn add_class(&mut self, class: &str) -> &mut Self {
        self.core.classes.add(class);
        self
    }

    /// Removes a tracked CSS class from the element.
    pub fn remove_class(&mut self, class: &str) -> &mut Self {
        self.core.classes.remove(class);
        self
    }

    /// Adds a CSS class to the wrapper.
    pub fn add_wrapper_class(&mut self, class: &str) -> &mut Self {
        self.core.wrapper_classes.add(class);
        self
    }

    /// Removes a tracked CSS class from the wrapper.
    pub fn remove_wrapper_class(&mut self, class: &str) -> &mut Self {
        self.core.wrapper_classes.remove(class);
        self
    }

    /// Replaces the field's errors.
    pub fn set_errors(&mut self, errors: Vec<String>) -> &mut Self {
        self.core.errors = errors;
        self
    }

    /// Appends an error message.
    pub fn add_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.core.errors.push(message.into());
        self
    }

    /// Returns the field's errors.
    pub fn errors(&self) -> &[String] {
        &self.core.errors
    }

    /// Copies submitted values into the field.
    pub fn populate(&mut self, values: &Values) -> &mut Self {
        self.kind.populate(&mut self.core, values);
        self
    }

    /// Shows `value` on first view only.
    ///
    /// The field is populated only when it belongs to a form that was not
    /// submitted and the caller does not assert a submission either.
    pub fn set_default(
        &mut self,
        value: impl Into<crate::FieldValue>,
        form_is_submitted: bool,
    ) -> &mut Self {
        let first_view = self
            .core
            .form()
            .is_some_and(|form| !form.is_submitted());

        if first_view && !form_is_submitted {
            let mut values = Values::new();
            values.insert(self.core.field_name.clone(), value.into());
            self.populate(&values);
        }
        self
    }

    /// Renders the error box.
    pub fn render_errors(&self) -> String {
        markup::error_box(
            self.core.options.str_or_empty("error_box_class"),
            &self.core.errors,
        )
    }

    /// Normalizes classes and claims tab indices from the owning form.
    fn pre_render(&self) -> RenderState {
        let mut attributes = self.core.attributes.clone();
        let class = self.core.classes.resolve(attributes.get("class"));
        attributes.set("class", class);

        let mut wrapper_attributes = self.core.wrapper_attributes.clone();
        let wrapper_class = self
            .core
            .wrapper_classes
            .resolve(wrapper_attributes.get("class"));
        wrapper_attributes.set("class", wrapper_class);

        let stops = self.kind.tab_stops();
        let tab_start = self
            .core
            .form()
            .and_then(|form| form.claim_tab_indexes(stops));

        if stops == 1 {
            if let Some(index) = tab_start {
                attributes.set("tabindex", Some(index.to_string()));
            }
        }

        RenderState {
            attributes,
            wrapper_attributes,
            tab_start,
        }
    }

    /// Renders the field with its wrapper, label and errors.
    pub fn render(&self) -> String {
        let state = self.pre_render();
        let mut html = String::new();

        let position = if self.core.render_errors && !self.core.errors.is_empty() {
            self.core
                .options
                .get_str("error_render_position")
                .and_then(ErrorPosition::from_str)
        } else {
            None
        };
        let errors_at = |at: ErrorPosition, html: &mut String| {
            if position == Some(at) {
                html.push_str(&self.render_errors());
            }
        };

        errors_at(ErrorPosition::TopOutside, &mut html);

        if let Some(tag) = &self.core.wrapper_tag {
            html.push_str(&markup::open_tag(tag, state.wrapper_attributes.iter()));
        }

        errors_at(ErrorPosition::TopInside, &mut html);

        if self.kind.renders_label() {
            if let Some(label) = &self.core.label {
                html.push_str(&self.core.render_label(label, state.attributes.get("id")));
            }
        }

        html.push_str(&self.kind.render_element(&self.core, &state));

        errors_at(ErrorPosition::BottomInside, &mut html);

        if let Some(tag) = &self.core.wrapper_tag {
            html.push_str(&markup::close_tag(tag));
        }

        errors_at(ErrorPosition::BottomOutside, &mut html);

        self.kind.post_render(&self.core, &mut html);

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Hidden, Text};

    fn text_field(attributes: &AttributeMap, options: &OptionMap) -> Field {
        Field::new(
            Box::new(Text::new()),
            "username",
            Some("Username"),
            attributes,
            options,
            &AttributeMap::new(),
        )
    }

    #[test]
    fn test_defaults_and_name() {
        let field = text_field(&AttributeMap::new(), &OptionMap::new());
        assert_eq!(field.attribute("type"), Some("text"));
        assert_eq!(field.attribute("name"), Some("username"));
        assert_eq!(field.options().get_str("error_box_class"), Some("field_error"));
        assert!(!field.has_form());
    }

    #[test]
    fn test_render_label_and_input() {
        let attrs = AttributeMap::new().with("id", "user");
        let field = text_field(&attrs, &OptionMap::new());

        assert_eq!(
            field.render(),
            r#"<label for="user">Username</label><input type="text" name="username" id="user" />"#
        );
    }

    #[test]
    fn test_before_after_and_label_options() {
        let options = OptionMap::new()
            .with("before", "<p>")
            .with("after", "</p>")
            .with("label_after_inner", ":");
        let field = text_field(&AttributeMap::new(), &options);

        assert_eq!(
            field.render(),
            r#"<label>Username:</label><p><input type="text" name="username" /></p>"#
        );
    }

    #[test]
    fn test_class_normalization() {
        let attrs = AttributeMap::new().with("class", "wide  tall");
        let mut field = text_field(&attrs, &OptionMap::new());
        field.add_class("tall").add_class("bold");

        let html = field.render();
        assert!(html.contains(r#"class="wide tall bold""#));
        // Rendering does not rewrite the stored attribute.
        assert_eq!(field.attribute("class"), Some("wide  tall"));

        field.remove_class("bold");
        assert!(field.render().contains(r#"class="wide tall""#));
    }

    #[test]
    fn test_wrapper_and_required_class() {
        let options = OptionMap::new().with("required", true);
        let mut field = text_field(&AttributeMap::new(), &options);
        field.set_wrapper(Some("li"), &AttributeMap::new().with("id", "row"));

        let html = field.render();
        assert!(html.starts_with(r#"<li id="row" class="field_required">"#));
        assert!(html.ends_with("</li>"));
    }

    #[test]
    fn test_error_positions() {
        let mut field = text_field(&AttributeMap::new(), &OptionMap::new());
        field.set_wrapper(Some("div"), &AttributeMap::new());
        field.add_error("Required");

        let html = field.render();
        let input_at = html.find("<input").unwrap();
        let error_at = html.find("<span>Required</span>").unwrap();
        assert!(error_at > input_at);
        assert!(html.ends_with("</div></div>"));

        field.set_option("error_render_position", "top_outside");
        let html = field.render();
        assert!(html.starts_with("<div"));
        assert!(html.find("<span>Required</span>").unwrap() < html.find("<label").unwrap());

        field.disable_errors(true);
        assert!(!field.render().contains("Required"));
    }

    #[test]
    fn test_disabled() {
        let mut field = text_field(&AttributeMap::new(), &OptionMap::new());
        field.disabled(true);
        assert_eq!(field.attribute("disabled"), Some("disabled"));
        field.disabled(false);
        assert!(!field.render().contains("disabled"));
    }

    #[test]
    fn test_set_default_requires_form() {
        let mut field = text_field(&AttributeMap::new(), &OptionMap::new());
        field.set_default("guest", false);
        assert_eq!(field.attribute("value"), None);
    }

    #[test]
    fn test_set_attributes_override_flag() {
        let attrs = AttributeMap::new().with("id", "a");
        let mut field = text_field(&attrs, &OptionMap::new());

        field.set_attributes(&AttributeMap::new().with("id", "b").with("size", "4"), false);
        assert_eq!(field.attribute("id"), Some("a"));
        assert_eq!(field.attribute("size"), Some("4"));

        field.set_attributes(&AttributeMap::new().with("id", "c"), true);
        assert_eq!(field.attribute("id"), Some("c"));
    }

    #[test]
    fn test_variant_downcast() {
        let field = text_field(&AttributeMap::new(), &OptionMap::new());
        assert!(field.variant::<Text>().is_some());
        assert!(field.variant::<Hidden>().is_none());
    }
}
