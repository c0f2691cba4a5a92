//! Form container.
//!
//! A [`Form`] owns its fields and the raw markup interleaved with them. It
//! cascades its field defaults, submitted values and errors into each field
//! as the field is added, and shares a [`FormContext`] (tab-index counter and
//! submission flag) with every field it owns.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::attrs::{AttributeMap, ClassList, OptionMap};
use crate::config::FormConfig;
use crate::error::ErrorMap;
use crate::field::Field;
use crate::markup;
use crate::registry::FieldRegistry;
use crate::value::Values;

/// Name of the hidden field marking a submission.
pub const SUBMITTED_FIELD: &str = "form_is_submitted";

const DEFAULT_ATTRIBUTES: [&str; 11] = [
    "accept",
    "accept-charset",
    "action",
    "autocomplete",
    "enctype",
    "method",
    "name",
    "novalidate",
    "target",
    "class",
    "id",
];

fn default_attributes() -> AttributeMap {
    let mut attributes = AttributeMap::with_keys(&DEFAULT_ATTRIBUTES);
    attributes.set("action", Some(""));
    attributes.set("method", Some("post"));
    attributes
}

fn default_options() -> OptionMap {
    OptionMap::new()
        .with("render_tag", true)
        .with("render_is_submitted_field", true)
        .with("before", "")
        .with("before_inner", "")
        .with("after_inner", "")
        .with("after", "")
}

/// State a form shares with its fields.
#[derive(Debug)]
pub struct FormContext {
    is_submitted: bool,
    tab_indexes: Cell<bool>,
    last_tab_index: Cell<u32>,
}

impl FormContext {
    fn new(is_submitted: bool) -> Self {
        Self {
            is_submitted,
            tab_indexes: Cell::new(false),
            last_tab_index: Cell::new(0),
        }
    }

    /// Whether the form's values came from a submission.
    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    pub fn tab_indexes_enabled(&self) -> bool {
        self.tab_indexes.get()
    }

    pub fn last_tab_index(&self) -> u32 {
        self.last_tab_index.get()
    }

    /// Reserves `count` consecutive tab indices and returns the first.
    ///
    /// Returns `None` without touching the counter when tab indexes are
    /// disabled, `count` is zero or the range would overflow.
    pub fn claim_tab_indexes(&self, count: usize) -> Option<u32> {
        if !self.tab_indexes.get() || count == 0 {
            return None;
        }
        let count = u32::try_from(count).ok()?;
        let first = self.last_tab_index.get().checked_add(1)?;
        let last = first.checked_add(count - 1)?;
        self.last_tab_index.set(last);
        Some(first)
    }
}

#[derive(Debug)]
enum Entry {
    Field(usize),
    Html(String),
}

/// An HTML form: fields plus interleaved markup.
pub struct Form {
    registry: FieldRegistry,
    attributes: AttributeMap,
    classes: ClassList,
    options: OptionMap,
    fields: Vec<Field>,
    entries: Vec<Entry>,
    field_attributes: AttributeMap,
    field_options: OptionMap,
    field_wrapper_tag: Option<String>,
    field_wrapper_attributes: AttributeMap,
    values: Values,
    errors: ErrorMap,
    render_errors: bool,
    context: Rc<FormContext>,
    progressive: bool,
    output: RefCell<String>,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("attributes", &self.attributes)
            .field("fields", &self.fields)
            .field("is_submitted", &self.context.is_submitted)
            .finish_non_exhaustive()
    }
}

impl Form {
    /// Creates a form using the process-wide field registry.
    pub fn new(
        attributes: &AttributeMap,
        options: &OptionMap,
        values: Values,
        errors: ErrorMap,
    ) -> Self {
        Self::with_registry(FieldRegistry::global(), attributes, options, values, errors)
    }

    /// Creates a form resolving field types through `registry`.
    pub fn with_registry(
        registry: FieldRegistry,
        attributes: &AttributeMap,
        options: &OptionMap,
        values: Values,
        errors: ErrorMap,
    ) -> Self {
        let options = default_options().layered(options);
        let with_marker = options.get_bool("render_is_submitted_field");
        let is_submitted = with_marker && values.contains_key(SUBMITTED_FIELD);

        let mut form = Self {
            registry,
            attributes: default_attributes().layered(attributes),
            classes: ClassList::new(),
            options,
            fields: Vec::new(),
            entries: Vec::new(),
            field_attributes: AttributeMap::new(),
            field_options: OptionMap::new(),
            field_wrapper_tag: None,
            field_wrapper_attributes: AttributeMap::new(),
            values,
            errors,
            render_errors: true,
            context: Rc::new(FormContext::new(is_submitted)),
            progressive: false,
            output: RefCell::new(String::new()),
        };

        if with_marker {
            form.add_field(
                "hidden",
                SUBMITTED_FIELD,
                None,
                &AttributeMap::new().with("value", "1"),
                &OptionMap::new(),
                &AttributeMap::new(),
            );
        }

        debug!(is_submitted, "Created form");
        form
    }

    /// Creates a form from a deserialized configuration.
    pub fn from_config(config: &FormConfig, values: Values, errors: ErrorMap) -> Self {
        let mut form = Self::new(&config.attributes, &config.options, values, errors);
        form.set_field_attributes(&config.field_attributes)
            .set_field_options(&config.field_options)
            .set_field_wrapper(
                config.field_wrapper_tag.as_deref(),
                &config.field_wrapper_attributes,
            )
            .enable_tab_indexes(config.tab_indexes)
            .disable_errors(!config.render_errors);
        form
    }

    /// Whether the supplied values carried the submission marker.
    pub fn is_submitted(&self) -> bool {
        self.context.is_submitted
    }

    /// Returns the context shared with the form's fields.
    pub fn context(&self) -> &Rc<FormContext> {
        &self.context
    }

    /// Turns error rendering off for fields added from now on.
    pub fn disable_errors(&mut self, disable: bool) -> &mut Self {
        self.render_errors = !disable;
        self
    }

    pub fn enable_tab_indexes(&mut self, enable: bool) -> &mut Self {
        self.context.tab_indexes.set(enable);
        self
    }

    pub fn tab_indexes_enabled(&self) -> bool {
        self.context.tab_indexes_enabled()
    }

    pub fn get_last_tab_index(&self) -> u32 {
        self.context.last_tab_index()
    }

    /// Moves the tab-index counter; the next claimed index is `index + 1`.
    pub fn set_last_tab_index(&mut self, index: u32) -> &mut Self {
        self.context.last_tab_index.set(index);
        self
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    pub fn set_attribute<V: Into<String>>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        self.attributes.set(name, value);
        self
    }

    pub fn set_option(&mut self, name: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.options.set(name, value);
        self
    }

    /// Merges form attributes, see [`AttributeMap::merge`].
    pub fn set_attributes(
        &mut self,
        attributes: &AttributeMap,
        override_existing: bool,
    ) -> &mut Self {
        self.attributes.merge(attributes, override_existing);
        self
    }

    /// Merges form options, see [`AttributeMap::merge`].
    pub fn set_options(&mut self, options: &OptionMap, override_existing: bool) -> &mut Self {
        self.options.merge(options, override_existing);
        self
    }

    pub fn add_class(&mut self, class: &str) -> &mut Self {
        self.classes.add(class);
        self
    }

    pub fn remove_class(&mut self, class: &str) -> &mut Self {
        self.classes.remove(class);
        self
    }

    /// Sets the wrapper applied to fields added from now on.
    pub fn set_field_wrapper(&mut self, tag: Option<&str>, attributes: &AttributeMap) -> &mut Self {
        self.field_wrapper_tag = tag.map(str::to_string);
        self.field_wrapper_attributes = attributes.clone();
        self
    }

    /// Sets attribute defaults for fields added from now on.
    pub fn set_field_attributes(&mut self, attributes: &AttributeMap) -> &mut Self {
        self.field_attributes = attributes.clone();
        self
    }

    /// Sets option defaults for fields added from now on.
    pub fn set_field_options(&mut self, options: &OptionMap) -> &mut Self {
        self.field_options = options.clone();
        self
    }

    pub fn set_values(&mut self, values: Values) -> &mut Self {
        self.values = values;
        self
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn set_errors(&mut self, errors: ErrorMap) -> &mut Self {
        self.errors = errors;
        self
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Adds a field and returns it for further configuration.
    ///
    /// The form's field defaults sit under the call-site maps. The field is
    /// populated from the form's values and receives the errors recorded
    /// under its name.
    pub fn add_field(
        &mut self,
        field_type: &str,
        field_name: &str,
        label: Option<&str>,
        attributes: &AttributeMap,
        options: &OptionMap,
        wrapper_attributes: &AttributeMap,
    ) -> &mut Field {
        let mut field = Field::new(
            self.registry.create(field_type),
            field_name,
            label,
            &self.field_attributes.layered(attributes),
            &self.field_options.layered(options),
            &self.field_wrapper_attributes.layered(wrapper_attributes),
        );

        field.populate(&self.values);
        field.disable_errors(!self.render_errors);
        field.set_wrapper(self.field_wrapper_tag.as_deref(), &AttributeMap::new());
        field.bind_form(&self.context);
        if let Some(errors) = self.errors.get(field_name) {
            field.set_errors(errors.clone());
        }

        let index = self.fields.len();
        self.fields.push(field);
        self.entries.push(Entry::Field(index));
        &mut self.fields[index]
    }

    /// Appends raw markup between fields.
    pub fn add_html(&mut self, html: impl Into<String>) -> &mut Self {
        let html = html.into();
        self.emit(&html);
        self.entries.push(Entry::Html(html));
        self
    }

    /// Returns the first field with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    /// Fields in insertion order, the submission marker included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Switches progressive mode: rendered pieces are also collected in an
    /// output buffer, see [`Form::take_output`].
    pub fn progressive_render(&mut self, on: bool) -> &mut Self {
        self.progressive = on;
        self
    }

    /// Drains the progressive output buffer.
    pub fn take_output(&self) -> String {
        self.output.take()
    }

    fn emit(&self, html: &str) {
        if self.progressive {
            self.output.borrow_mut().push_str(html);
        }
    }

    /// Renders `before`, the opening `<form>` tag and `before_inner`.
    pub fn open(&self) -> String {
        let mut attributes = self.attributes.clone();
        let class = self.classes.resolve(attributes.get("class"));
        attributes.set("class", class);

        let mut html = self.options.str_or_empty("before").to_string();
        if self.options.get_bool("render_tag") {
            html.push_str(&markup::open_tag("form", attributes.iter()));
        }
        html.push_str(self.options.str_or_empty("before_inner"));

        self.emit(&html);
        html
    }

    /// Renders `after_inner`, the closing tag and `after`.
    pub fn close(&self) -> String {
        let mut html = self.options.str_or_empty("after_inner").to_string();
        if self.options.get_bool("render_tag") {
            html.push_str(&markup::close_tag("form"));
        }
        html.push_str(self.options.str_or_empty("after"));

        self.emit(&html);
        html
    }

    /// Renders every field and markup entry in insertion order.
    pub fn render_fields(&self) -> String {
        let html: String = self
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Field(index) => self.fields[*index].render(),
                Entry::Html(html) => html.clone(),
            })
            .collect();

        self.emit(&html);
        html
    }

    /// Renders one field by name.
    pub fn render_field(&self, name: &str) -> Option<String> {
        let html = self.field(name)?.render();
        self.emit(&html);
        Some(html)
    }

    /// Renders the whole form.
    pub fn render(&self) -> String {
        let mut html = self.open();
        html.push_str(&self.render_fields());
        html.push_str(&self.close());
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::values;

    fn form(values: Values) -> Form {
        Form::with_registry(
            FieldRegistry::with_builtins(),
            &AttributeMap::new(),
            &OptionMap::new(),
            values,
            ErrorMap::new(),
        )
    }

    fn add_text<'a>(form: &'a mut Form, name: &str) -> &'a Field {
        form.add_field(
            "text",
            name,
            None,
            &AttributeMap::new(),
            &OptionMap::new(),
            &AttributeMap::new(),
        )
    }

    #[test]
    fn test_default_render() {
        let form = form(Values::new());
        assert!(!form.is_submitted());
        assert_eq!(
            form.render(),
            concat!(
                r#"<form action="" method="post">"#,
                r#"<input type="hidden" name="form_is_submitted" value="1" />"#,
                "</form>",
            )
        );
    }

    #[test]
    fn test_submission_marker() {
        let form = form(values([(SUBMITTED_FIELD, "1")]));
        assert!(form.is_submitted());
        assert_eq!(form.fields()[0].name(), SUBMITTED_FIELD);

        let options = OptionMap::new().with("render_is_submitted_field", false);
        let form = Form::with_registry(
            FieldRegistry::with_builtins(),
            &AttributeMap::new(),
            &options,
            values([(SUBMITTED_FIELD, "1")]),
            ErrorMap::new(),
        );
        assert!(!form.is_submitted());
        assert!(form.fields().is_empty());
    }

    #[test]
    fn test_add_field_cascade() {
        let mut errors = ErrorMap::new();
        errors.add("email", "This is not a valid email");
        let mut form = Form::with_registry(
            FieldRegistry::with_builtins(),
            &AttributeMap::new(),
            &OptionMap::new(),
            values([("email", "nope")]),
            errors,
        );
        form.set_field_attributes(&AttributeMap::new().with("size", "20").with("class", "input"))
            .set_field_wrapper(
                Some("li"),
                &AttributeMap::new().with("class", "row").with("id", "w"),
            );

        let field = form.add_field(
            "text",
            "email",
            Some("Email"),
            &AttributeMap::new().with("size", "40"),
            &OptionMap::new(),
            &AttributeMap::new().with("id", "email_row"),
        );

        assert!(field.has_form());
        assert_eq!(field.attribute("size"), Some("40"));
        assert_eq!(field.attribute("class"), Some("input"));
        assert_eq!(field.attribute("value"), Some("nope"));
        assert_eq!(field.wrapper_attributes().get("id"), Some("email_row"));
        assert_eq!(field.wrapper_attributes().get("class"), Some("row"));
        assert_eq!(field.errors(), ["This is not a valid email".to_string()]);
    }

    #[test]
    fn test_disable_errors_cascades() {
        let mut errors = ErrorMap::new();
        errors.add("name", "Required");
        let mut form = Form::with_registry(
            FieldRegistry::with_builtins(),
            &AttributeMap::new(),
            &OptionMap::new(),
            Values::new(),
            errors,
        );
        form.disable_errors(true);
        let field = add_text(&mut form, "name");
        assert!(!field.render().contains("Required"));
    }

    #[test]
    fn test_tab_indexes() {
        let mut form = form(Values::new());
        form.enable_tab_indexes(true);
        add_text(&mut form, "a");
        add_text(&mut form, "b");

        let html = form.render_fields();
        assert!(html.contains(r#"name="a" tabindex="1""#));
        assert!(html.contains(r#"name="b" tabindex="2""#));
        assert!(!html.contains(r#"name="form_is_submitted" tabindex"#));
        assert_eq!(form.get_last_tab_index(), 2);

        form.set_last_tab_index(10);
        assert!(form.render_field("a").unwrap().contains(r#"tabindex="11""#));
    }

    #[test]
    fn test_tab_indexes_skipped_at_counter_limit() {
        let mut form = form(Values::new());
        form.enable_tab_indexes(true);
        add_text(&mut form, "a");
        add_text(&mut form, "b");

        form.set_last_tab_index(u32::MAX);
        let html = form.render_fields();
        assert!(html.contains(r#"<input type="text" name="a" />"#));
        assert!(!html.contains("tabindex"));
        assert_eq!(form.get_last_tab_index(), u32::MAX);

        form.set_last_tab_index(u32::MAX - 1);
        let html = form.render_fields();
        assert!(html.contains(&format!(r#"name="a" tabindex="{}""#, u32::MAX)));
        assert!(html.contains(r#"<input type="text" name="b" />"#));
        assert_eq!(form.get_last_tab_index(), u32::MAX);
    }

    #[test]
    fn test_classes_and_tag_options() {
        let options = OptionMap::new()
            .with("render_tag", false)
            .with("render_is_submitted_field", false)
            .with("before", "<section>")
            .with("after", "</section>");
        let mut form = Form::with_registry(
            FieldRegistry::with_builtins(),
            &AttributeMap::new(),
            &options,
            Values::new(),
            ErrorMap::new(),
        );
        assert_eq!(form.render(), "<section></section>");

        form.set_option("render_tag", true).add_class("login").add_class("wide");
        form.set_attribute("class", Some("card"));
        assert_eq!(
            form.open(),
            r#"<section><form action="" method="post" class="card login wide">"#
        );
    }

    #[test]
    fn test_progressive_render() {
        let mut form = form(Values::new());
        form.progressive_render(true);
        form.open();
        form.add_html("<fieldset>");
        add_text(&mut form, "q");
        form.render_field("q");
        form.close();

        assert_eq!(
            form.take_output(),
            concat!(
                r#"<form action="" method="post">"#,
                "<fieldset>",
                r#"<input type="text" name="q" />"#,
                "</form>",
            )
        );
        assert_eq!(form.take_output(), "");
        assert!(form.render_field("missing").is_none());
    }
}
