//! Option list suppliers for fields declaring `options = "<list name>"`.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves a named option list into an ordered key to label mapping.
pub trait OptionSupplier: Send + Sync {
	fn get(&self, list: &str) -> Option<IndexMap<String, String>>;
}

/// In-memory option lists.
///
/// # Examples
///
/// ```
/// use palisade_forms::{OptionSupplier, StaticOptions};
///
/// let options = StaticOptions::new()
///     .with_list("salutation", [("mr", "Mr."), ("ms", "Ms.")]);
///
/// let list = options.get("salutation").unwrap();
/// assert_eq!(list.first(), Some((&"mr".to_string(), &"Mr.".to_string())));
/// assert!(options.get("country").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
	lists: HashMap<String, IndexMap<String, String>>,
}

impl StaticOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_list<K, V>(mut self, name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.insert(name, entries);
		self
	}

	pub fn insert<K, V>(&mut self, name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>)
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.lists.insert(
			name.into(),
			entries
				.into_iter()
				.map(|(key, label)| (key.into(), label.into()))
				.collect(),
		);
	}
}

impl OptionSupplier for StaticOptions {
	fn get(&self, list: &str) -> Option<IndexMap<String, String>> {
		self.lists.get(list).cloned()
	}
}

/// Loads `<dir>/<list>.json` on each lookup.
///
/// Each file holds one JSON object whose key order is the option order.
/// Values may be strings or numbers. A missing or malformed file yields
/// `None`.
#[derive(Debug, Clone)]
pub struct JsonOptionDirectory {
	dir: PathBuf,
}

impl JsonOptionDirectory {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	fn load(&self, list: &str) -> Result<IndexMap<String, String>, String> {
		if list.is_empty() || list.contains(['/', '\\']) || list.contains("..") {
			return Err("invalid list name".to_string());
		}
		let path = self.dir.join(format!("{}.json", list));
		let content = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
		let entries: IndexMap<String, serde_json::Value> =
			serde_json::from_str(&content).map_err(|e| e.to_string())?;
		entries
			.into_iter()
			.map(|(key, label)| match label {
				serde_json::Value::String(label) => Ok((key, label)),
				serde_json::Value::Number(n) => Ok((key, n.to_string())),
				other => Err(format!("option '{}' has a non-scalar label: {}", key, other)),
			})
			.collect()
	}
}

impl OptionSupplier for JsonOptionDirectory {
	fn get(&self, list: &str) -> Option<IndexMap<String, String>> {
		match self.load(list) {
			Ok(entries) => Some(entries),
			Err(reason) => {
				tracing::warn!(
					list = %list,
					dir = %self.dir.display(),
					%reason,
					"failed to load option list"
				);
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::fs;
	use tempfile::TempDir;

	#[rstest]
	fn test_json_directory_preserves_file_order() {
		// Arrange
		let dir = TempDir::new().unwrap();
		fs::write(
			dir.path().join("countries.json"),
			r#"{"de": "Germany", "at": "Austria", "ch": "Switzerland", "1": 1}"#,
		)
		.unwrap();
		let supplier = JsonOptionDirectory::new(dir.path());

		// Act
		let list = supplier.get("countries").unwrap();

		// Assert
		assert_eq!(
			list.keys().collect::<Vec<_>>(),
			vec!["de", "at", "ch", "1"]
		);
		assert_eq!(list.get("1").map(String::as_str), Some("1"));
	}

	#[rstest]
	#[case("missing")]
	#[case("../etc/passwd")]
	#[case("broken")]
	fn test_json_directory_failures_yield_none(#[case] list: &str) {
		// Arrange
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join("broken.json"), "[1, 2").unwrap();
		let supplier = JsonOptionDirectory::new(dir.path());

		// Act & Assert
		assert!(supplier.get(list).is_none());
	}
}
