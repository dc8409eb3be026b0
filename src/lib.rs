//! # Palisade
//!
//! Whitelist validation of untrusted input. Every accepted field is declared
//! up front with its type, bounds and cross-field rules; anything else is
//! rejected. Validation failures come back as localized messages per field.
//!
//! ## Feature Flags
//!
//! - `forms` - Field definitions, coercion, the rule evaluator and form sessions
//! - `i18n` - Message catalogs and the `Translator` used for error messages
//! - `full` (default) - Everything above
//!
//! ## Quick Example
//!
//! ```
//! use palisade::prelude::*;
//! use std::sync::Arc;
//!
//! let translator = Arc::new(TranslationContext::with_defaults("de"));
//! let mut form = Form::new("login", translator);
//! form.add_field("user", FieldDefinition::new(FieldType::String).required().with_caption("Benutzer"))?;
//!
//! form.set_writable_values([("user", "")]);
//! form.validate()?;
//!
//! assert_eq!(form.first_error()?, Some("Benutzer ist ein Pflichtfeld."));
//! # Ok::<(), palisade::forms::FormError>(())
//! ```

#[cfg(feature = "forms")]
pub mod forms {
	//! Form definitions, values and validation.
	pub use palisade_forms::*;
}

#[cfg(feature = "i18n")]
pub mod i18n {
	//! Message catalogs and translation.
	pub use palisade_i18n::*;
}

#[cfg(feature = "forms")]
pub use palisade_forms::{
	FieldDefinition, FieldType, FieldValue, Form, FormConfig, FormDefinition, FormError,
	FormResult,
};

#[cfg(feature = "i18n")]
pub use palisade_i18n::{MessageCatalog, TranslationContext, Translator};

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "forms")]
	pub use palisade_forms::{
		FieldDefinition, FieldPatch, FieldType, FieldValue, Form, FormConfig, FormDefinition,
		FormError, FormResult, Limit, OptionSupplier, Patch, StaticOptions,
	};

	#[cfg(feature = "i18n")]
	pub use palisade_i18n::{MessageCatalog, TranslationContext, Translator};
}
