//! Form definitions loaded from TOML or JSON files.
//!
//! ```toml
//! name = "contact"
//! locale = "de"
//! options_dir = "options"
//!
//! [fields.firstname]
//! type = "string"
//! min = 2
//! max = 10
//!
//! [fields.country]
//! type = "string"
//! options = "countries"
//!
//! [groups]
//! person = ["firstname", "country"]
//! ```

use crate::definition::FormDefinition;
use crate::error::FormError;
use crate::form::Form;
use crate::options::JsonOptionDirectory;
use indexmap::IndexMap;
use palisade_i18n::Translator;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Unsupported form definition format: {0}")]
	UnsupportedFormat(PathBuf),
	#[error(transparent)]
	Form(#[from] FormError),
}

/// A form definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
	pub name: String,
	/// Locale applied to the translator when the form is built.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
	/// Directory of `<list>.json` option files for named option lists.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options_dir: Option<PathBuf>,
	#[serde(default)]
	pub fields: FormDefinition,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub groups: IndexMap<String, Vec<String>>,
}

impl FormConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(content)?)
	}

	/// Load a `.toml` or `.json` file. A relative `options_dir` is resolved
	/// against the file's directory.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let mut config = match path.extension().and_then(|ext| ext.to_str()) {
			Some("toml") => Self::from_toml_str(&content)?,
			Some("json") => Self::from_json_str(&content)?,
			_ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
		};
		if let Some(dir) = &config.options_dir
			&& dir.is_relative()
			&& let Some(parent) = path.parent()
		{
			config.options_dir = Some(parent.join(dir));
		}
		Ok(config)
	}
}

impl Form {
	/// Build a form from a loaded definition file.
	///
	/// # Examples
	///
	/// ```
	/// use palisade_forms::{FormConfig, Form};
	/// use palisade_i18n::TranslationContext;
	/// use std::sync::Arc;
	///
	/// let config = FormConfig::from_toml_str(r#"
	///     name = "newsletter"
	///
	///     [fields.email]
	///     type = "email"
	///     required = true
	/// "#).unwrap();
	///
	/// let form = Form::from_config(config, Arc::new(TranslationContext::with_defaults("en"))).unwrap();
	/// assert_eq!(form.name(), "newsletter");
	/// assert!(form.definition().contains("email"));
	/// ```
	pub fn from_config(config: FormConfig, translator: Arc<dyn Translator>) -> Result<Self, FormError> {
		if let Some(locale) = &config.locale {
			translator.set_locale(locale)?;
		}
		let mut form = Form::new(config.name, translator);
		if let Some(dir) = config.options_dir {
			form = form.with_option_supplier(Arc::new(JsonOptionDirectory::new(dir)));
		}
		let mut form = form.with_definition(config.fields)?;
		form.set_groups(config.groups)?;
		tracing::debug!(
			form = %form.name(),
			fields = form.definition().len(),
			"form built from config"
		);
		Ok(form)
	}

	/// Load a definition file and build the form from it.
	pub fn from_path(path: impl AsRef<Path>, translator: Arc<dyn Translator>) -> Result<Self, ConfigError> {
		let config = FormConfig::from_path(path)?;
		Ok(Self::from_config(config, translator)?)
	}
}
