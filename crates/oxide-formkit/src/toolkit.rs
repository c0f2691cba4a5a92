//! Entry point building forms, standalone fields, validators and handlers.

use crate::attrs::{AttributeMap, OptionMap};
use crate::error::ErrorMap;
use crate::field::Field;
use crate::form::Form;
use crate::handler::RequestHandler;
use crate::registry::FieldRegistry;
use crate::validation::{RuleRegistry, Validator};
use crate::value::Values;

/// Factory sharing one field registry and one rule registry.
#[derive(Debug, Clone)]
pub struct FormToolkit {
    fields: FieldRegistry,
    rules: RuleRegistry,
}

impl Default for FormToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl FormToolkit {
    /// Uses snapshots of the process-wide registries.
    pub fn new() -> Self {
        Self::with_registries(FieldRegistry::global(), RuleRegistry::global())
    }

    pub fn with_registries(fields: FieldRegistry, rules: RuleRegistry) -> Self {
        Self { fields, rules }
    }

    pub fn field_registry(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn rule_registry(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Creates a form.
    pub fn create_form(
        &self,
        attributes: &AttributeMap,
        options: &OptionMap,
        values: Values,
        errors: ErrorMap,
    ) -> Form {
        Form::with_registry(self.fields.clone(), attributes, options, values, errors)
    }

    /// Creates a field that belongs to no form.
    ///
    /// Without a form the field claims no tab indices and ignores
    /// [`Field::set_default`].
    pub fn create_field(
        &self,
        field_type: &str,
        field_name: &str,
        label: Option<&str>,
        attributes: &AttributeMap,
        options: &OptionMap,
        wrapper_attributes: &AttributeMap,
    ) -> Field {
        Field::new(
            self.fields.create(field_type),
            field_name,
            label,
            attributes,
            options,
            wrapper_attributes,
        )
    }

    /// Creates a validator over a snapshot of submitted values.
    pub fn create_validator(&self, values: Values) -> Validator {
        Validator::with_registry(self.rules.clone(), values)
    }

    /// Creates an empty request handler.
    pub fn create_handler(&self) -> RequestHandler {
        RequestHandler::new()
    }
}
