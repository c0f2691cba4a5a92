//! Low-level markup emission.
//!
//! Fields and forms assemble their output through these helpers only, so the
//! concrete tag syntax lives in one place.

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::Span;

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders `(name, value)` pairs as ` name="value"`, escaping values.
pub fn attributes<'a>(attrs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    attrs
        .map(|(k, v)| format!(r#" {k}="{}""#, html_escape(v)))
        .collect()
}

/// Renders an opening tag.
pub fn open_tag<'a>(tag: &str, attrs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    format!("<{tag}{}>", attributes(attrs))
}

/// Renders a closing tag.
pub fn close_tag(tag: &str) -> String {
    format!("</{tag}>")
}

/// Renders a self-closing `<input />`.
pub fn input<'a>(attrs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    format!("<input{} />", attributes(attrs))
}

/// Renders the error container: one `<span>` per message.
pub fn error_box(class: &str, errors: &[String]) -> String {
    html! { div.class(#class) }
        .children(errors, |error, span: Element<Span>| span.text(error))
        .render()
}
