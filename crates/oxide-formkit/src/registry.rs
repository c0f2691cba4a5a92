//! Field variant registry.
//!
//! Maps type tokens (`"text"`, `"select"`, ...) to variant factories. A
//! process-wide registry is seeded with the built-ins; forms take a snapshot
//! of it when they are created, so later registrations only affect new forms.

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::field::FieldKind;
use crate::fields::{Button, Checkbox, ChoiceGroup, Hidden, Select, Text, Textarea};

/// Builds a fresh variant instance.
pub type VariantFactory = Arc<dyn Fn() -> Box<dyn FieldKind> + Send + Sync>;

static GLOBAL_REGISTRY: Lazy<RwLock<FieldRegistry>> =
    Lazy::new(|| RwLock::new(FieldRegistry::with_builtins()));

/// Token to factory map.
#[derive(Clone, Default)]
pub struct FieldRegistry {
    factories: IndexMap<String, VariantFactory>,
}

impl std::fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("tokens", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FieldRegistry {
    /// Creates an empty registry. Every token falls back to `text`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the ten built-in variants.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_variant("text", || Box::new(Text::new()));
        registry.register_variant("password", || Box::new(Text::password()));
        registry.register_variant("hidden", || Box::new(Hidden));
        registry.register_variant("textarea", || Box::new(Textarea::new()));
        registry.register_variant("checkbox", || Box::new(Checkbox));
        registry.register_variant("checkbox_group", || Box::new(ChoiceGroup::checkboxes()));
        registry.register_variant("radio_group", || Box::new(ChoiceGroup::radios()));
        registry.register_variant("select", || Box::new(Select::new()));
        registry.register_variant("submit", || Box::new(Button::submit()));
        registry.register_variant("button", || Box::new(Button::button()));
        registry
    }

    /// Returns a snapshot of the process-wide registry.
    pub fn global() -> Self {
        GLOBAL_REGISTRY
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registers or replaces a variant.
    pub fn register_variant<F>(&mut self, token: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn FieldKind> + Send + Sync + 'static,
    {
        self.factories.insert(token.into(), Arc::new(factory));
    }

    /// Returns the factory for a token.
    pub fn get(&self, token: &str) -> Option<&VariantFactory> {
        self.factories.get(token)
    }

    /// Returns whether a token is registered.
    pub fn contains(&self, token: &str) -> bool {
        self.factories.contains_key(token)
    }

    /// Registered tokens in registration order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Builds the variant for `token`, falling back to a text input when the
    /// token is unknown.
    pub fn create(&self, token: &str) -> Box<dyn FieldKind> {
        match self.factories.get(token) {
            Some(factory) => factory(),
            None => {
                debug!(token = %token, "Unknown field type, using text");
                Box::new(Text::new())
            }
        }
    }
}

/// Registers a variant in the process-wide registry.
pub fn register_global_variant<F>(token: impl Into<String>, factory: F)
where
    F: Fn() -> Box<dyn FieldKind> + Send + Sync + 'static,
{
    let token = token.into();
    info!(token = %token, "Registering field type");
    GLOBAL_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_variant(token, factory);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let registry = FieldRegistry::with_builtins();
        assert_eq!(registry.tokens().count(), 10);
        for token in registry.tokens() {
            assert_eq!(registry.create(token).type_token(), token);
        }
    }

    #[test]
    fn test_unknown_token_falls_back_to_text() {
        let registry = FieldRegistry::with_builtins();
        assert!(!registry.contains("color"));
        assert_eq!(registry.create("color").type_token(), "text");
        assert_eq!(FieldRegistry::new().create("select").type_token(), "text");
    }

    #[test]
    fn test_register_variant() {
        let mut registry = FieldRegistry::new();
        registry.register_variant("email", || Box::new(Hidden));
        assert!(registry.get("email").is_some());
        assert_eq!(registry.create("email").type_token(), "hidden");
    }

    #[test]
    fn test_global_registration() {
        register_global_variant("secret_token", || Box::new(Hidden));
        assert!(FieldRegistry::global().contains("secret_token"));
        assert!(FieldRegistry::global().contains("radio_group"));
    }
}
