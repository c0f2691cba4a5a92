//! Built-in validation rules.
//!
//! Each rule receives the whole submitted-values snapshot, the name of the
//! field under test and the rule's data.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{RuleOutcome, RulePredicate};
use crate::value::{FieldValue, Values};

static EMAIL_LOCAL_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~.-]+$").expect("valid local part pattern")
});

static DOMAIN_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z0-9-]+$").expect("valid domain label pattern"));

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("valid decimal pattern")
});

const INVALID_EMAIL: &str = "This is not a valid email";

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B')
}

/// Renders rule data the way it appears in messages.
fn data_to_string(data: &Value) -> Option<String> {
    match data {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses decimal text such as `"5"`, `" -1.5 "` or `"2e3"`. Words like
/// `NaN` or `inf` are not numbers here.
fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if !DECIMAL.is_match(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn not_equal_message(expected: &str) -> RuleOutcome {
    RuleOutcome::FailWith(format!("This field must be equal to {expected}"))
}

/// Fails when the value is missing, an empty string or an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNotEmpty;

impl RulePredicate for IsNotEmpty {
    fn check(&self, values: &Values, field_name: &str, _data: &Value) -> RuleOutcome {
        match values.get(field_name) {
            Some(value) if !value.is_empty() => RuleOutcome::Pass,
            _ => RuleOutcome::Fail,
        }
    }

    fn default_message(&self) -> Option<&str> {
        Some("This field cannot be empty")
    }
}

/// Loose comparison against the rule data.
///
/// Decimal strings compare by value (`"5.0"` equals `5`). A missing field
/// equals an empty string or numeric zero. Data other than a string or
/// number makes the comparison not applicable, which passes.
pub fn is_equal_to(values: &Values, field_name: &str, data: &Value) -> RuleOutcome {
    let Some(expected) = data_to_string(data) else {
        return RuleOutcome::Pass;
    };

    let equal = match values.get(field_name) {
        None => match data {
            Value::Number(n) => n.as_f64() == Some(0.0),
            _ => expected.is_empty(),
        },
        Some(FieldValue::Text(actual)) => match (parse_decimal(actual), parse_decimal(&expected)) {
            (Some(a), Some(b)) => a == b,
            _ => *actual == expected,
        },
        Some(FieldValue::List(_)) => false,
    };

    if equal {
        RuleOutcome::Pass
    } else {
        not_equal_message(&expected)
    }
}

/// Strict comparison against the rule data: the value must be text equal to
/// a string datum. Submitted values are never numbers, so numeric data
/// always fails.
pub fn is_exactly_equal_to(values: &Values, field_name: &str, data: &Value) -> RuleOutcome {
    let Some(expected) = data_to_string(data) else {
        return RuleOutcome::Pass;
    };

    let equal = match (values.get(field_name), data) {
        (Some(FieldValue::Text(actual)), Value::String(s)) => actual == s,
        _ => false,
    };

    if equal {
        RuleOutcome::Pass
    } else {
        not_equal_message(&expected)
    }
}

/// Compares the field with another field named by the rule data.
///
/// Lists are compared as sets, text is compared after trimming. Anything
/// else, including a missing field on either side, fails.
pub fn is_identical_to(values: &Values, field_name: &str, data: &Value) -> RuleOutcome {
    let other_name = data_to_string(data).unwrap_or_default();

    let identical = match (values.get(field_name), values.get(&other_name)) {
        (Some(FieldValue::List(a)), Some(FieldValue::List(b))) => {
            let a: IndexSet<&String> = a.iter().collect();
            let b: IndexSet<&String> = b.iter().collect();
            a == b
        }
        (Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) => a.trim() == b.trim(),
        _ => false,
    };

    if identical {
        RuleOutcome::Pass
    } else {
        not_equal_message(&other_name)
    }
}

/// Structural e-mail check with a specific message for each failure.
pub fn is_valid_email(values: &Values, field_name: &str, _data: &Value) -> RuleOutcome {
    let email = match values.get(field_name) {
        None => return RuleOutcome::FailWith("Email must not be blank".to_string()),
        Some(value) if value.is_empty() => {
            return RuleOutcome::FailWith("Email must not be blank".to_string())
        }
        Some(FieldValue::List(_)) => return RuleOutcome::FailWith(INVALID_EMAIL.to_string()),
        Some(FieldValue::Text(email)) => email.as_str(),
    };

    if email.len() < 3 {
        return RuleOutcome::FailWith("Email is too short".to_string());
    }

    let Some((local, domain)) = email
        .find('@')
        .filter(|&at| at > 0)
        .map(|at| (&email[..at], &email[at + 1..]))
    else {
        return RuleOutcome::FailWith("Email has no @ symbol".to_string());
    };

    if valid_local_part(local) && valid_domain(domain) {
        RuleOutcome::Pass
    } else {
        RuleOutcome::FailWith(INVALID_EMAIL.to_string())
    }
}

fn valid_local_part(local: &str) -> bool {
    EMAIL_LOCAL_PART.is_match(local)
}

fn valid_domain(domain: &str) -> bool {
    if domain.contains("..") {
        return false;
    }
    if domain.trim_matches(|c: char| is_blank(c) || c == '.') != domain {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    labels.iter().all(|label| {
        label.trim_matches(|c: char| is_blank(c) || c == '-') == *label
            && DOMAIN_LABEL.is_match(label)
    })
}

/// Tests the value against the regular expression given as rule data.
///
/// Non-text values and unusable patterns fail.
pub fn matches_pattern(values: &Values, field_name: &str, data: &Value) -> RuleOutcome {
    let (Some(FieldValue::Text(value)), Some(pattern)) = (values.get(field_name), data.as_str())
    else {
        return RuleOutcome::Fail;
    };

    match Regex::new(pattern) {
        Ok(regex) if regex.is_match(value) => RuleOutcome::Pass,
        _ => RuleOutcome::Fail,
    }
}
