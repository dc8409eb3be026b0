//! Message catalog for storing translations

use crate::error::{I18nError, I18nResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// A message catalog containing translations for a specific locale
///
/// # Example
/// ```
/// use palisade_i18n::MessageCatalog;
///
/// let mut catalog = MessageCatalog::new("fr");
/// catalog.add("form.field_required", "%field% est obligatoire.");
///
/// assert_eq!(
///     catalog.get("form.field_required"),
///     Some(&"%field% est obligatoire.".to_string())
/// );
/// assert_eq!(catalog.language(), "fr");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
	locale: String,
	messages: HashMap<String, String>,
}

impl MessageCatalog {
	/// Create a new message catalog for the given locale
	pub fn new(locale: &str) -> Self {
		Self {
			locale: locale.to_string(),
			messages: HashMap::new(),
		}
	}

	/// Build a catalog from a JSON object.
	///
	/// Nested objects are flattened with `.` separators, so
	/// `{"form": {"date": "%d.%m.%Y"}}` defines the token `form.date`.
	///
	/// # Example
	/// ```
	/// use palisade_i18n::MessageCatalog;
	///
	/// let catalog = MessageCatalog::from_json_str(
	///     "nl",
	///     r#"{"form": {"field_required": "%field% is verplicht."}}"#,
	/// )
	/// .unwrap();
	/// assert_eq!(
	///     catalog.get("form.field_required"),
	///     Some(&"%field% is verplicht.".to_string())
	/// );
	/// ```
	pub fn from_json_str(locale: &str, json: &str) -> I18nResult<Self> {
		let root: Value = serde_json::from_str(json)?;
		let mut catalog = Self::new(locale);
		catalog.load_value("", &root)?;
		Ok(catalog)
	}

	/// Load a JSON catalog file. The locale is taken from the file stem
	/// (`locale/de.json` becomes `de`).
	pub fn from_path(path: impl AsRef<Path>) -> I18nResult<Self> {
		let path = path.as_ref();
		let locale = path
			.file_stem()
			.and_then(|stem| stem.to_str())
			.ok_or_else(|| I18nError::InvalidLocale(path.display().to_string()))?;
		let content = std::fs::read_to_string(path).map_err(|source| I18nError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json_str(locale, &content)
	}

	fn load_value(&mut self, prefix: &str, value: &Value) -> I18nResult<()> {
		match value {
			Value::String(text) => {
				self.messages.insert(prefix.to_string(), text.clone());
				Ok(())
			}
			Value::Object(entries) => {
				for (key, nested) in entries {
					let token = if prefix.is_empty() {
						key.clone()
					} else {
						format!("{}.{}", prefix, key)
					};
					self.load_value(&token, nested)?;
				}
				Ok(())
			}
			_ => Err(I18nError::InvalidEntry(prefix.to_string())),
		}
	}

	/// Get the locale for this catalog
	pub fn locale(&self) -> &str {
		&self.locale
	}

	/// The language part of the locale (`de_CH` and `de-CH` both give `de`).
	pub fn language(&self) -> &str {
		self.locale.split(['-', '_']).next().unwrap_or(&self.locale)
	}

	/// Add a translation
	pub fn add(&mut self, message: impl Into<String>, translation: impl Into<String>) {
		self.messages.insert(message.into(), translation.into());
	}

	/// Copy every entry of `other` into this catalog, overriding existing tokens.
	pub fn merge(&mut self, other: &MessageCatalog) {
		for (token, text) in &other.messages {
			self.messages.insert(token.clone(), text.clone());
		}
	}

	/// Get a translation
	pub fn get(&self, message: &str) -> Option<&String> {
		self.messages.get(message)
	}

	pub fn len(&self) -> usize {
		self.messages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_message_catalog_basic() {
		// Arrange
		let mut catalog = MessageCatalog::new("es");
		catalog.add("form.invalid_email", "%field% no es un correo válido.");

		// Act
		let result = catalog.get("form.invalid_email");
		let missing = catalog.get("form.unknown");

		// Assert
		assert_eq!(result, Some(&"%field% no es un correo válido.".to_string()));
		assert_eq!(missing, None);
	}

	#[rstest]
	#[case("de", "de")]
	#[case("de_CH", "de")]
	#[case("pt-BR", "pt")]
	fn test_language_strips_region(#[case] locale: &str, #[case] expected: &str) {
		// Arrange
		let catalog = MessageCatalog::new(locale);

		// Act & Assert
		assert_eq!(catalog.language(), expected);
	}

	#[rstest]
	fn test_from_json_flattens_nested_objects() {
		// Arrange
		let json = r#"{"form": {"date": "%d/%m/%Y", "messages": {"ok": "fine"}}, "plain": "x"}"#;

		// Act
		let catalog = MessageCatalog::from_json_str("fr", json).unwrap();

		// Assert
		assert_eq!(catalog.get("form.date"), Some(&"%d/%m/%Y".to_string()));
		assert_eq!(catalog.get("form.messages.ok"), Some(&"fine".to_string()));
		assert_eq!(catalog.get("plain"), Some(&"x".to_string()));
		assert_eq!(catalog.len(), 3);
	}

	#[rstest]
	fn test_from_json_rejects_non_string_leaf() {
		// Act
		let result = MessageCatalog::from_json_str("fr", r#"{"form": {"date": 3}}"#);

		// Assert
		assert!(matches!(result, Err(I18nError::InvalidEntry(token)) if token == "form.date"));
	}

	#[rstest]
	fn test_from_path_uses_file_stem_as_locale() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("it.json");
		let mut file = std::fs::File::create(&path).unwrap();
		write!(file, r#"{{"form": {{"field_required": "%field% è obbligatorio."}}}}"#).unwrap();

		// Act
		let catalog = MessageCatalog::from_path(&path).unwrap();

		// Assert
		assert_eq!(catalog.locale(), "it");
		assert_eq!(
			catalog.get("form.field_required"),
			Some(&"%field% è obbligatorio.".to_string())
		);
	}

	#[rstest]
	fn test_merge_overrides_existing_tokens() {
		// Arrange
		let mut base = MessageCatalog::new("en");
		base.add("a", "1");
		base.add("b", "2");
		let mut overrides = MessageCatalog::new("en");
		overrides.add("b", "two");

		// Act
		base.merge(&overrides);

		// Assert
		assert_eq!(base.get("a"), Some(&"1".to_string()));
		assert_eq!(base.get("b"), Some(&"two".to_string()));
	}
}
