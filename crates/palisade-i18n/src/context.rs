//! Locale-aware translation context

use crate::catalog::MessageCatalog;
use crate::defaults;
use crate::error::{I18nError, I18nResult};
use crate::translator::{Translator, interpolate};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A set of catalogs with one active locale and one fallback locale.
///
/// Lookups try the active locale first, then the fallback. Locale identifiers
/// are matched case-insensitively with `-` and `_` treated alike; when no
/// catalog exists for a regional locale (`de_CH`), the language catalog (`de`)
/// is used.
///
/// The active locale sits behind a lock so a context can be shared through an
/// `Arc` and still switch locale per request.
///
/// # Example
/// ```
/// use palisade_i18n::{MessageCatalog, TranslationContext, Translator};
///
/// let mut ctx = TranslationContext::new("fr", "en");
/// let mut fr = MessageCatalog::new("fr");
/// fr.add("Hello", "Bonjour");
/// ctx.add_catalog(fr).unwrap();
///
/// assert_eq!(ctx.translate("Hello", &[]), "Bonjour");
/// assert_eq!(ctx.translate("Goodbye", &[]), "Goodbye");
/// ```
#[derive(Debug)]
pub struct TranslationContext {
	catalogs: HashMap<String, MessageCatalog>,
	fallback: String,
	active: RwLock<String>,
}

fn normalize(locale: &str) -> String {
	locale.trim().replace('-', "_").to_lowercase()
}

impl TranslationContext {
	/// Create an empty context with the given active and fallback locales.
	pub fn new(locale: &str, fallback: &str) -> Self {
		Self {
			catalogs: HashMap::new(),
			fallback: normalize(fallback),
			active: RwLock::new(normalize(locale)),
		}
	}

	/// Create a context preloaded with the built-in English and German catalogs,
	/// falling back to English.
	///
	/// An unknown `locale` leaves English active.
	pub fn with_defaults(locale: &str) -> Self {
		let mut ctx = Self::new("en", "en");
		ctx.catalogs.insert("en".to_string(), defaults::english());
		ctx.catalogs.insert("de".to_string(), defaults::german());
		if let Err(e) = ctx.set_locale(locale) {
			tracing::debug!(error = %e, "keeping default locale");
		}
		ctx
	}

	/// Register a catalog. A catalog for an already registered locale is merged
	/// into the existing one, overriding its entries.
	pub fn add_catalog(&mut self, catalog: MessageCatalog) -> I18nResult<()> {
		let key = normalize(catalog.locale());
		if key.is_empty() {
			return Err(I18nError::InvalidLocale(catalog.locale().to_string()));
		}
		match self.catalogs.get_mut(&key) {
			Some(existing) => existing.merge(&catalog),
			None => {
				self.catalogs.insert(key, catalog);
			}
		}
		Ok(())
	}

	/// Locales with a registered catalog.
	pub fn available_locales(&self) -> Vec<String> {
		let mut locales: Vec<String> = self.catalogs.keys().cloned().collect();
		locales.sort();
		locales
	}

	/// Map a requested locale to a registered catalog key.
	pub fn resolve_locale(&self, requested: &str) -> Option<String> {
		let key = normalize(requested);
		if self.catalogs.contains_key(&key) {
			return Some(key);
		}
		let language = key.split('_').next().unwrap_or(&key);
		self.catalogs
			.contains_key(language)
			.then(|| language.to_string())
	}

	fn lookup(&self, token: &str) -> Option<String> {
		let active = self.active.read();
		let found = self
			.catalogs
			.get(active.as_str())
			.and_then(|catalog| catalog.get(token));
		found
			.or_else(|| {
				self.catalogs
					.get(&self.fallback)
					.and_then(|catalog| catalog.get(token))
			})
			.cloned()
	}
}

impl Translator for TranslationContext {
	fn translate(&self, token: &str, params: &[(&str, &str)]) -> String {
		match self.lookup(token) {
			Some(template) => interpolate(&template, params),
			None => interpolate(token, params),
		}
	}

	fn locale(&self) -> String {
		self.active.read().clone()
	}

	fn set_locale(&self, locale: &str) -> I18nResult<()> {
		let resolved = self
			.resolve_locale(locale)
			.ok_or_else(|| I18nError::UnknownLocale(locale.to_string()))?;
		*self.active.write() = resolved;
		Ok(())
	}
}
