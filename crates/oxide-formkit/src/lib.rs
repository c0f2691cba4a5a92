//! # oxide-formkit
//!
//! Server-side HTML form building, population and rule-based validation.
//!
//! This crate provides:
//! - Ten field types sharing one render pipeline (text, password, textarea,
//!   hidden, checkbox, checkbox group, radio group, select, submit, button)
//! - Forms cascading defaults, submitted values and errors into their fields
//! - Sequential tab indices across a form
//! - A validator with six built-in rules and a registry for custom ones
//! - A request handler carrying values and errors across a redirect
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_formkit::validation::Rule;
//! use oxide_formkit::{values, AttributeMap, FormToolkit, OptionMap};
//!
//! let toolkit = FormToolkit::new();
//! let submitted = values([("form_is_submitted", "1"), ("email", "nobody")]);
//!
//! // Validate
//! let mut validator = toolkit.create_validator(submitted.clone());
//! validator
//!     .add_rule("email", Rule::named("is_valid_email"), None, ())
//!     .unwrap();
//! assert!(!validator.validate());
//!
//! // Re-render with the submitted values and errors
//! let mut form = toolkit.create_form(
//!     &AttributeMap::new().with("id", "signup"),
//!     &OptionMap::new(),
//!     submitted,
//!     validator.errors().clone(),
//! );
//! form.set_field_wrapper(Some("li"), &AttributeMap::new());
//! form.add_field(
//!     "text",
//!     "email",
//!     Some("Email"),
//!     &AttributeMap::new().with("id", "email"),
//!     &OptionMap::new().with("required", true),
//!     &AttributeMap::new(),
//! );
//!
//! let html = form.render();
//! assert!(form.is_submitted());
//! assert!(html.contains(concat!(
//!     r#"<li class="field_required"><label for="email">Email</label>"#,
//!     r#"<input type="text" name="email" id="email" value="nobody" />"#,
//! )));
//! assert!(html.contains("Email has no @ symbol"));
//! ```
//!
//! ## Field Variants
//!
//! Variant-specific settings are reached through [`Field::variant_mut`]:
//!
//! ```rust
//! use oxide_formkit::fields::Select;
//! use oxide_formkit::{AttributeMap, FormToolkit, OptionMap};
//!
//! let mut field = FormToolkit::new().create_field(
//!     "select",
//!     "country",
//!     None,
//!     &AttributeMap::new(),
//!     &OptionMap::new().with("sort", "asc"),
//!     &AttributeMap::new(),
//! );
//! if let Some(select) = field.variant_mut::<Select>() {
//!     select
//!         .add_select_option("nl", "Netherlands", None)
//!         .add_select_option("be", "Belgium", None);
//! }
//!
//! assert_eq!(
//!     field.render(),
//!     concat!(
//!         r#"<select name="country">"#,
//!         r#"<option value="be">Belgium</option>"#,
//!         r#"<option value="nl">Netherlands</option>"#,
//!         "</select>",
//!     )
//! );
//! ```

mod attrs;
mod config;
mod error;
mod field;
pub mod fields;
mod form;
mod handler;
pub mod markup;
mod registry;
mod session;
mod toolkit;
pub mod validation;
mod value;

pub use attrs::{AttributeMap, ClassList, OptionMap};
pub use config::FormConfig;
pub use error::{ErrorMap, FormError, Result};
pub use field::{ErrorPosition, Field, FieldCore, FieldKind, RenderState};
pub use form::{Form, FormContext, SUBMITTED_FIELD};
pub use handler::{
    parse_urlencoded, Method, RequestHandler, SubmittedRequest, SESSION_ERRORS_KEY,
    SESSION_VALUES_KEY,
};
pub use registry::{register_global_variant, FieldRegistry, VariantFactory};
pub use session::{MemorySession, SessionStore};
pub use toolkit::FormToolkit;
pub use value::{values, FieldValue, Values};
