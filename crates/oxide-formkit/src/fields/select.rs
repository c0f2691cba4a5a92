//! `<select>` with optional option groups and sorting.

use std::any::Any;

use indexmap::IndexMap;
use tracing::debug;

use super::derive_name;
use crate::field::{FieldCore, FieldKind, RenderState};
use crate::markup;
use crate::value::Values;

/// Direction of label sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses `asc` or `desc`, ignoring case.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    fn apply(self, keys: &mut [&str]) {
        keys.sort_unstable();
        if self == Self::Desc {
            keys.reverse();
        }
    }
}

/// One `<option>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub group: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            group: None,
        }
    }

    /// Places the option in an `<optgroup>`.
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// A `<select>` element. Options are keyed by label: adding a second option
/// with a known label is ignored.
#[derive(Debug, Clone, Default)]
pub struct Select {
    options: IndexMap<String, SelectOption>,
    groups: IndexMap<String, Vec<String>>,
    ungrouped: Vec<String>,
    selected: Vec<String>,
    sort: Option<SortOrder>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option, optionally inside a named group.
    pub fn add_select_option(
        &mut self,
        value: impl Into<String>,
        label: impl Into<String>,
        group: Option<&str>,
    ) -> &mut Self {
        let label = label.into();
        if self.options.contains_key(&label) {
            debug!(label = %label, "Ignoring duplicate select option");
            return self;
        }

        match group {
            Some(group) => self
                .groups
                .entry(group.to_string())
                .or_default()
                .push(label.clone()),
            None => self.ungrouped.push(label.clone()),
        }
        self.options.insert(
            label.clone(),
            SelectOption {
                value: value.into(),
                label,
                group: group.map(str::to_string),
            },
        );
        self
    }

    pub fn add_select_options(
        &mut self,
        options: impl IntoIterator<Item = SelectOption>,
    ) -> &mut Self {
        for option in options {
            self.add_select_option(option.value, option.label, option.group.as_deref());
        }
        self
    }

    /// Replaces every option and group.
    pub fn set_select_options(
        &mut self,
        options: impl IntoIterator<Item = SelectOption>,
    ) -> &mut Self {
        self.options.clear();
        self.groups.clear();
        self.ungrouped.clear();
        self.add_select_options(options)
    }

    /// Sorts groups by name and options by label at render time.
    pub fn sort(&mut self, order: SortOrder) -> &mut Self {
        self.sort = Some(order);
        self
    }

    pub fn select_options(&self) -> impl Iterator<Item = &SelectOption> {
        self.options.values()
    }

    /// Returns whether `value` was submitted.
    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|v| v == value)
    }

    fn ordered<'a>(&self, keys: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
        let mut keys: Vec<&str> = keys.collect();
        if let Some(order) = self.sort {
            order.apply(&mut keys);
        }
        keys
    }

    fn render_options(&self, labels: &[String], html: &mut String) {
        for label in self.ordered(labels.iter().map(String::as_str)) {
            let Some(option) = self.options.get(label) else {
                continue;
            };
            let selected = self.is_selected(&option.value).then_some(("selected", "selected"));
            let attrs = std::iter::once(("value", option.value.as_str())).chain(selected);
            html.push_str(&markup::open_tag("option", attrs));
            html.push_str(&markup::html_escape(&option.label));
            html.push_str(&markup::close_tag("option"));
        }
    }
}

impl FieldKind for Select {
    fn type_token(&self) -> &str {
        "select"
    }

    fn init(&mut self, core: &mut FieldCore) {
        core.attributes.set::<String>("type", None);
        core.attributes.set::<String>("value", None);
        let suffix = if core.attributes.get("multiple").is_some() {
            "[]"
        } else {
            ""
        };
        derive_name(core, suffix);

        if let Some(order) = core.options.get_str("sort").and_then(SortOrder::from_str) {
            self.sort = Some(order);
        }
    }

    fn populate(&mut self, core: &mut FieldCore, values: &Values) {
        if let Some(value) = values.get(&core.field_name) {
            self.selected = value.to_list();
        }
    }

    fn tab_stops(&self) -> usize {
        1
    }

    fn render_element(&self, core: &FieldCore, state: &RenderState) -> String {
        let mut html = markup::open_tag("select", state.attributes.iter());

        for group in self.ordered(self.groups.keys().map(String::as_str)) {
            html.push_str(&markup::open_tag("optgroup", [("label", group)].into_iter()));
            if let Some(labels) = self.groups.get(group) {
                self.render_options(labels, &mut html);
            }
            html.push_str(&markup::close_tag("optgroup"));
        }
        self.render_options(&self.ungrouped, &mut html);

        html.push_str(&markup::close_tag("select"));
        core.wrap_element(&html)
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

    fn select(attributes: &AttributeMap, options: &OptionMap) -> Field {
        Field::new(
            Box::new(Select::new()),
            "fruit",
            None,
            attributes,
            options,
            &AttributeMap::new(),
        )
    }

    fn fill(field: &mut Field) {
        let select = field.variant_mut::<Select>().unwrap();
        select
            .add_select_option("p", "Pear", None)
            .add_select_option("a", "Apple", None)
            .add_select_option("k", "Kale", Some("Veg"))
            .add_select_option("b", "Beet", Some("Veg"))
            .add_select_option("z", "Apple", None);
    }

    #[test]
    fn test_insertion_order_and_duplicates() {
        let mut field = select(&AttributeMap::new(), &OptionMap::new());
        fill(&mut field);
        field.populate(&values([("fruit", "a")]));

        assert_eq!(
            field.render(),
            concat!(
                r#"<select name="fruit">"#,
                r#"<optgroup label="Veg"><option value="k">Kale</option><option value="b">Beet</option></optgroup>"#,
                r#"<option value="p">Pear</option><option value="a" selected="selected">Apple</option>"#,
                "</select>",
            )
        );
        assert_eq!(field.variant::<Select>().unwrap().select_options().count(), 4);
    }

    #[test]
    fn test_sort_descending_from_option() {
        let mut field = select(&AttributeMap::new(), &OptionMap::new().with("sort", "DESC"));
        fill(&mut field);

        let html = field.render();
        assert!(html.contains(r#"<option value="k">Kale</option><option value="b">Beet</option>"#));
        assert!(
            html.contains(r#"<option value="p">Pear</option><option value="a">Apple</option>"#)
        );
    }

    #[test]
    fn test_sort_ascending() {
        let mut field = select(&AttributeMap::new(), &OptionMap::new());
        fill(&mut field);
        field.variant_mut::<Select>().unwrap().sort(SortOrder::Asc);

        let html = field.render();
        assert!(html.contains(r#"<option value="b">Beet</option><option value="k">Kale</option>"#));
        assert!(
            html.contains(r#"<option value="a">Apple</option><option value="p">Pear</option>"#)
        );
    }

    #[test]
    fn test_multiple_select() {
        let mut field = select(
            &AttributeMap::new().with("multiple", "multiple"),
            &OptionMap::new(),
        );
        fill(&mut field);
        field.populate(&values([("fruit", vec!["a", "b"])]));

        let html = field.render();
        assert!(html.starts_with(r#"<select name="fruit[]" multiple="multiple">"#));
        let select = field.variant::<Select>().unwrap();
        assert!(select.is_selected("a"));
        assert!(select.is_selected("b"));
        assert!(!select.is_selected("p"));
    }

    #[test]
    fn test_set_select_options_replaces() {
        let mut select = Select::new();
        select.add_select_option("a", "Apple", None);
        select.set_select_options([
            SelectOption::new("k", "Kale").in_group("Veg"),
            SelectOption::new("p", "Pear"),
        ]);

        let options: Vec<_> = select.select_options().cloned().collect();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].group.as_deref(), Some("Veg"));
        assert_eq!(options[1].group, None);
    }
}
