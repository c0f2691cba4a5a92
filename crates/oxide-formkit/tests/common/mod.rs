#![allow(dead_code)]

use oxide_formkit::validation::RuleRegistry;
use oxide_formkit::{
    AttributeMap, ErrorMap, FieldRegistry, Form, FormToolkit, OptionMap, Values,
};

/// Toolkit with isolated registries holding only the built-ins.
pub fn toolkit() -> FormToolkit {
    FormToolkit::with_registries(FieldRegistry::with_builtins(), RuleRegistry::with_builtins())
}

pub fn form(values: Values, errors: ErrorMap) -> Form {
    toolkit().create_form(&AttributeMap::new(), &OptionMap::new(), values, errors)
}

/// Adds a field with no call-site attributes or options.
pub fn add(form: &mut Form, field_type: &str, name: &str) {
    form.add_field(
        field_type,
        name,
        None,
        &AttributeMap::new(),
        &OptionMap::new(),
        &AttributeMap::new(),
    );
}

/// Returns the `tabindex` values in rendering order.
pub fn tab_indexes(html: &str) -> Vec<u32> {
    html.split(r#"tabindex=""#)
        .skip(1)
        .filter_map(|rest| rest.split('"').next()?.parse().ok())
        .collect()
}
