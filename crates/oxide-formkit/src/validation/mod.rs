//! Rule-based validation of submitted values.
//!
//! A [`Validator`] holds a snapshot of submitted values and an ordered list
//! of rules per field. Rules are predicates: either resolved by name from a
//! [`RuleRegistry`] or supplied directly as [`Rule::Custom`].

mod rules;

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ErrorMap, FormError, Result};
use crate::value::Values;

pub use rules::{
    is_equal_to, is_exactly_equal_to, is_identical_to, is_valid_email, matches_pattern, IsNotEmpty,
};

/// Message used when neither the rule nor its predicate supplies one.
pub const DEFAULT_MESSAGE: &str = "Please correct this field";

/// Result of running one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The value is acceptable.
    Pass,
    /// The value is rejected; the message comes from the rule's override,
    /// the predicate's default message or [`DEFAULT_MESSAGE`], in that order.
    Fail,
    /// The value is rejected with this exact message.
    FailWith(String),
}

impl RuleOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Pass)
    }
}

impl From<bool> for RuleOutcome {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

/// A validation predicate.
///
/// Closures of the form `Fn(&Values, &str, &Value) -> RuleOutcome` implement
/// this trait.
pub trait RulePredicate: Send + Sync {
    /// Checks `field_name` within the submitted `values`.
    fn check(&self, values: &Values, field_name: &str, data: &Value) -> RuleOutcome;

    /// Message used on [`RuleOutcome::Fail`] when the rule has no override.
    fn default_message(&self) -> Option<&str> {
        None
    }
}

impl<F> RulePredicate for F
where
    F: Fn(&Values, &str, &Value) -> RuleOutcome + Send + Sync,
{
    fn check(&self, values: &Values, field_name: &str, data: &Value) -> RuleOutcome {
        self(values, field_name, data)
    }
}

/// A rule as passed to [`Validator::add_rule`].
#[derive(Clone)]
pub enum Rule {
    /// Resolved by name against the validator's registry.
    Named(String),
    /// A caller-supplied predicate.
    Custom(Arc<dyn RulePredicate>),
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish_non_exhaustive(),
        }
    }
}

impl Rule {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn custom(predicate: impl RulePredicate + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }
}

/// A resolved rule attached to one field.
#[derive(Clone)]
pub struct ValidationRule {
    predicate: Arc<dyn RulePredicate>,
    message: Option<String>,
    data: Value,
}

impl ValidationRule {
    fn run(&self, values: &Values, field_name: &str) -> Option<String> {
        match self.predicate.check(values, field_name, &self.data) {
            RuleOutcome::Pass => None,
            RuleOutcome::FailWith(message) => Some(message),
            RuleOutcome::Fail => Some(
                self.message
                    .as_deref()
                    .or_else(|| self.predicate.default_message())
                    .unwrap_or(DEFAULT_MESSAGE)
                    .to_string(),
            ),
        }
    }
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("message", &self.message)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

static GLOBAL_RULES: Lazy<RwLock<RuleRegistry>> =
    Lazy::new(|| RwLock::new(RuleRegistry::with_builtins()));

/// Named rule predicates.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: IndexMap<String, Arc<dyn RulePredicate>>,
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the six built-in rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("is_not_empty", IsNotEmpty);
        registry.register("is_equal_to", is_equal_to);
        registry.register("is_exactly_equal_to", is_exactly_equal_to);
        registry.register("is_identical_to", is_identical_to);
        registry.register("is_valid_email", is_valid_email);
        registry.register("matches_pattern", matches_pattern);
        registry
    }

    /// Returns a snapshot of the process-wide registry.
    pub fn global() -> Self {
        GLOBAL_RULES
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registers or replaces a named rule.
    pub fn register(&mut self, name: impl Into<String>, predicate: impl RulePredicate + 'static) {
        self.rules.insert(name.into(), Arc::new(predicate));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn RulePredicate>> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}

/// Registers a named rule in the process-wide registry.
pub fn register_global_rule(name: impl Into<String>, predicate: impl RulePredicate + 'static) {
    let name = name.into();
    info!(rule = %name, "Registering validation rule");
    GLOBAL_RULES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, predicate);
}

/// Validates a snapshot of submitted values.
///
/// ```rust
/// use oxide_formkit::validation::{Rule, Validator};
/// use oxide_formkit::values;
///
/// let mut validator = Validator::new(values([("email", "nobody")]));
/// validator
///     .add_rule("email", Rule::named("is_valid_email"), None, ())
///     .unwrap();
///
/// assert!(!validator.validate());
/// assert_eq!(validator.field_errors("email"), ["Email has no @ symbol"]);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    registry: RuleRegistry,
    rules: IndexMap<String, Vec<ValidationRule>>,
    fields: Values,
    errors: ErrorMap,
}

impl Validator {
    /// Creates a validator resolving names through the process-wide registry.
    pub fn new(fields: Values) -> Self {
        Self::with_registry(RuleRegistry::global(), fields)
    }

    pub fn with_registry(registry: RuleRegistry, fields: Values) -> Self {
        Self {
            registry,
            rules: IndexMap::new(),
            fields,
            errors: ErrorMap::new(),
        }
    }

    /// Attaches a rule to a field.
    ///
    /// `message` overrides the predicate's default message on a plain
    /// failure. `data` is handed to the predicate unchanged (the expected
    /// value, the other field's name, the pattern).
    ///
    /// Fails without registering anything when a named rule is unknown or a
    /// `matches_pattern` pattern does not compile.
    pub fn add_rule(
        &mut self,
        field_name: &str,
        rule: Rule,
        message: Option<&str>,
        data: impl Into<Value>,
    ) -> Result<()> {
        let data = data.into();
        let predicate = match rule {
            Rule::Custom(predicate) => predicate,
            Rule::Named(name) => {
                let Some(predicate) = self.registry.get(&name) else {
                    warn!(field = %field_name, rule = %name, "Unknown validation rule");
                    return Err(FormError::UnknownRule(name));
                };
                if name == "matches_pattern" {
                    if let Some(pattern) = data.as_str() {
                        Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
                            pattern: pattern.to_string(),
                            source,
                        })?;
                    }
                }
                debug!(field = %field_name, rule = %name, "Added validation rule");
                Arc::clone(predicate)
            }
        };

        self.rules
            .entry(field_name.to_string())
            .or_default()
            .push(ValidationRule {
                predicate,
                message: message.map(str::to_string),
                data,
            });
        Ok(())
    }

    /// Runs every rule and returns whether all passed.
    ///
    /// Fields run in the order their first rule was added, rules in the
    /// order they were added. Every failure adds one message. Errors from a
    /// previous run are discarded.
    pub fn validate(&mut self) -> bool {
        let mut errors = ErrorMap::new();
        for (field_name, rules) in &self.rules {
            for rule in rules {
                if let Some(message) = rule.run(&self.fields, field_name) {
                    errors.add(field_name, message);
                }
            }
        }

        debug!(
            fields = self.rules.len(),
            failed = errors.len(),
            "Validated values"
        );
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Returns the messages of one field, empty when it passed.
    pub fn field_errors(&self, field_name: &str) -> &[String] {
        self.errors.get(field_name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the values under validation.
    pub fn values(&self) -> &Values {
        &self.fields
    }
}
