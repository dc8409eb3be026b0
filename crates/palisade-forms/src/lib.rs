//! Whitelist validation for untrusted form input.
//!
//! A [`Form`] holds an ordered set of [`FieldDefinition`]s. Values written to
//! the form are coerced according to their field type; [`Form::validate`]
//! runs every field through the rule evaluator and collects localized error
//! messages per field.
//!
//! ## Example
//!
//! ```
//! use palisade_forms::{FieldDefinition, FieldType, Form};
//! use palisade_i18n::TranslationContext;
//! use std::sync::Arc;
//!
//! let mut form = Form::new("signup", Arc::new(TranslationContext::with_defaults("en")));
//! form.add_field("firstname", FieldDefinition::new(FieldType::String).with_min(2).with_max(10)).unwrap();
//! form.add_field("temperature", FieldDefinition::new(FieldType::Numeric).with_min(29.9).with_max(50.1)).unwrap();
//! form.add_field("email", FieldDefinition::new(FieldType::Email)).unwrap();
//!
//! let input = serde_json::json!({
//!     "firstname": "Michael",
//!     "temperature": 31,
//!     "email": "xyz@ibm.com",
//! });
//! form.set_values(input.as_object().unwrap().clone()).unwrap();
//!
//! assert!(form.validate().unwrap());
//! ```
//!
//! Field validation failures are data, read through [`Form::errors`] and
//! friends. [`FormError`] is reserved for programming mistakes: unknown
//! fields, invalid definitions and session misuse.

pub mod coerce;
pub mod config;
pub mod definition;
pub mod error;
pub mod export;
pub mod field_type;
pub mod form;
pub mod options;
pub mod rules;
pub mod session;
pub mod store;
pub mod validators;
pub mod value;

pub use coerce::{coerce, coerce_bool};
pub use config::{ConfigError, FormConfig};
pub use definition::{FieldDefinition, FieldPatch, FormDefinition, Limit, OptionsSource, Patch, TypeParams};
pub use error::{FormError, FormResult};
pub use export::{FieldExport, FormMetadata};
pub use field_type::FieldType;
pub use form::Form;
pub use options::{JsonOptionDirectory, OptionSupplier, StaticOptions};
pub use rules::{RuleContext, evaluate};
pub use session::{ErrorCollector, ValidationState};
pub use store::ValueStore;
pub use value::FieldValue;
