use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum I18nError {
	#[error("No catalog registered for locale '{0}'")]
	UnknownLocale(String),
	#[error("Invalid locale identifier '{0}'")]
	InvalidLocale(String),
	#[error("Failed to read catalog {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Malformed catalog: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Catalog entry '{0}' must be a string or a nested object")]
	InvalidEntry(String),
}

pub type I18nResult<T> = Result<T, I18nError>;
