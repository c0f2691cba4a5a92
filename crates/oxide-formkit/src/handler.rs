//! Request-side state: submitted values and errors.
//!
//! A [`RequestHandler`] holds the values and errors of one request. It reads
//! them from a [`SubmittedRequest`] and can park them in a session so they
//! survive a redirect (post, validate, redirect, re-render).

use tracing::{debug, warn};

use crate::error::{ErrorMap, FormError, Result};
use crate::markup::html_escape;
use crate::session::SessionStore;
use crate::value::{FieldValue, Values};

/// Session key holding parked values.
pub const SESSION_VALUES_KEY: &str = "form_value_array";

/// Session key holding parked errors.
pub const SESSION_ERRORS_KEY: &str = "form_error_array";

/// Request method selecting which submitted map to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Parses a method name, ignoring case.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Snapshot of a request's query string and form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedRequest {
    /// Query string values.
    pub get: Values,
    /// Form body values.
    pub post: Values,
}

impl SubmittedRequest {
    pub fn new(get: Values, post: Values) -> Self {
        Self { get, post }
    }

    /// Builds a request from a raw query string and an
    /// `application/x-www-form-urlencoded` body.
    pub fn from_parts(query: &str, body: &str) -> Self {
        Self {
            get: parse_urlencoded(query),
            post: parse_urlencoded(body),
        }
    }

    /// Builds a GET-only request.
    pub fn from_query_string(query: &str) -> Self {
        Self::from_parts(query, "")
    }

    /// Builds a POST-only request.
    pub fn from_form_body(body: &str) -> Self {
        Self::from_parts("", body)
    }

    /// Returns the values submitted with `method`.
    pub fn values(&self, method: Method) -> &Values {
        match method {
            Method::Get => &self.get,
            Method::Post => &self.post,
        }
    }
}

/// Parses `application/x-www-form-urlencoded` pairs.
///
/// Keys ending in `[]` collect their values into a list under the bare name.
/// A repeated plain key keeps its last value.
pub fn parse_urlencoded(input: &str) -> Values {
    let mut values = Values::new();
    for pair in input.split('&').filter(|p| !p.is_empty()) {
        let mut parts = pair.splitn(2, '=');
        let key = urlencoding_decode(parts.next().unwrap_or(""));
        let value = urlencoding_decode(parts.next().unwrap_or(""));

        match key.strip_suffix("[]") {
            Some(name) => {
                let entry = values
                    .entry(name.to_string())
                    .or_insert_with(|| FieldValue::List(Vec::new()));
                if let FieldValue::Text(_) = entry {
                    *entry = FieldValue::List(Vec::new());
                }
                if let FieldValue::List(items) = entry {
                    items.push(value);
                }
            }
            None => {
                values.insert(key, FieldValue::Text(value));
            }
        }
    }
    values
}

/// Decodes `%XX` escapes and `+`, interpreting the bytes as UTF-8.
fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let byte = s
                    .get(i + 1..i + 3)
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = byte {
                    decoded.push(byte);
                    i += 3;
                    continue;
                }
                decoded.push(b'%');
            }
            b'+' => decoded.push(b' '),
            b => decoded.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

/// Undoes backslash escaping: `\x` becomes `x` and `\\` becomes `\`.
fn strip_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('0') => out.push('\0'),
                Some(next) => out.push(next),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Values and errors of the current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestHandler {
    values: Values,
    errors: ErrorMap,
}

impl RequestHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `method` carried any submitted values.
    pub fn is_request(request: &SubmittedRequest, method: Method) -> bool {
        !request.values(method).is_empty()
    }

    /// Takes the values submitted with `method` as this handler's values and
    /// returns them.
    pub fn get_request(&mut self, request: &SubmittedRequest, method: Method) -> Values {
        let values = request.values(method).clone();
        debug!(method = method.as_str(), fields = values.len(), "Read submitted values");
        self.values = values.clone();
        values
    }

    /// Loads values and errors parked in the session, then clears them.
    ///
    /// Returns whether both were present. A payload that does not decode is
    /// discarded.
    pub fn get_session_data(&mut self, session: &mut dyn SessionStore) -> bool {
        let (Some(values), Some(errors)) = (
            session.get_value(SESSION_VALUES_KEY).cloned(),
            session.get_value(SESSION_ERRORS_KEY).cloned(),
        ) else {
            return false;
        };
        session.remove_value(SESSION_VALUES_KEY);
        session.remove_value(SESSION_ERRORS_KEY);

        match (
            serde_json::from_value::<Values>(values),
            serde_json::from_value::<ErrorMap>(errors),
        ) {
            (Ok(values), Ok(errors)) => {
                debug!(
                    fields = values.len(),
                    errors = errors.len(),
                    "Restored form state from session"
                );
                self.values = values;
                self.errors = errors;
                true
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Discarding undecodable form state in session");
                false
            }
        }
    }

    /// Parks the current values and errors in the session.
    pub fn set_session_data(&self, session: &mut dyn SessionStore) -> Result<()> {
        let values = serde_json::to_value(&self.values).map_err(FormError::Session)?;
        let errors = serde_json::to_value(&self.errors).map_err(FormError::Session)?;
        session.set_value(SESSION_VALUES_KEY, values);
        session.set_value(SESSION_ERRORS_KEY, errors);
        Ok(())
    }

    pub fn set_values(&mut self, values: Values) -> &mut Self {
        self.values = values;
        self
    }

    pub fn set_value(&mut self, field_name: &str, value: impl Into<FieldValue>) -> &mut Self {
        self.values.insert(field_name.to_string(), value.into());
        self
    }

    pub fn get_values(&self) -> &Values {
        &self.values
    }

    pub fn get_field_value(&self, field_name: &str) -> Option<&FieldValue> {
        self.values.get(field_name)
    }

    /// Returns a text value with backslash escaping removed and HTML special
    /// characters escaped, ready for literal redisplay. Lists are returned
    /// unchanged.
    pub fn get_field_value_clean(&self, field_name: &str) -> Option<FieldValue> {
        self.values.get(field_name).map(|value| match value {
            FieldValue::Text(s) => FieldValue::Text(html_escape(&strip_slashes(s))),
            FieldValue::List(_) => value.clone(),
        })
    }

    pub fn set_errors(&mut self, errors: ErrorMap) -> &mut Self {
        self.errors = errors;
        self
    }

    /// Appends an error message to a field.
    pub fn add_error(&mut self, field_name: &str, message: impl Into<String>) -> &mut Self {
        self.errors.add(field_name, message);
        self
    }

    pub fn get_errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Returns the messages of one field, empty when there are none.
    pub fn get_field_errors(&self, field_name: &str) -> &[String] {
        self.errors
            .get(field_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
