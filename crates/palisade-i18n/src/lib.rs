//! Message resolution for Palisade
//!
//! This crate supplies the localized strings used by form validation:
//! - Per-locale [`MessageCatalog`]s, loadable from JSON
//! - A shareable [`TranslationContext`] with locale negotiation and fallback
//! - The [`Translator`] trait consumed by `palisade-forms`
//! - Built-in English and German catalogs for every `form.*` token
//!
//! ## Example
//!
//! ```
//! use palisade_i18n::{TranslationContext, Translator};
//!
//! let ctx = TranslationContext::with_defaults("de");
//! let message = ctx.translate("form.field_required", &[("field", "E-Mail")]);
//! assert_eq!(message, "E-Mail ist ein Pflichtfeld.");
//! ```

pub mod catalog;
pub mod context;
pub mod defaults;
pub mod error;
pub mod translator;

pub use catalog::MessageCatalog;
pub use context::TranslationContext;
pub use error::{I18nError, I18nResult};
pub use translator::{Translator, interpolate};
