//! Field definitions and the ordered definition registry.
//!
//! A [`FieldDefinition`] is the property set of one field, serialized with the
//! same property names the client-side validator reads:
//!
//! ```json
//! {
//!   "email": {"type": "email", "required": true, "caption": "form.caption.email"},
//!   "age": {"type": "int", "min": 18, "max": 130, "page": 2},
//!   "newsletter": {"type": "bool", "optional": true}
//! }
//! ```

use crate::error::{FormError, FormResult};
use crate::field_type::FieldType;
use crate::validators;
use crate::value::FieldValue;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;

/// A `min`/`max` bound. Its meaning depends on the field type: a number for
/// numeric types, a count for lists and options, a length for text, a day
/// offset or absolute date for temporal types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
	Int(i64),
	Float(f64),
	Text(String),
}

impl Limit {
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Limit::Int(i) => Some(*i as f64),
			Limit::Float(f) => Some(*f),
			Limit::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
		}
	}

	/// Non-negative integer bound used for counts and lengths.
	pub fn as_count(&self) -> Option<usize> {
		match self {
			Limit::Int(i) => usize::try_from(*i).ok(),
			_ => None,
		}
	}
}

impl fmt::Display for Limit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Limit::Int(i) => write!(f, "{}", i),
			Limit::Float(x) => write!(f, "{}", x),
			Limit::Text(s) => f.write_str(s),
		}
	}
}

impl From<i64> for Limit {
	fn from(value: i64) -> Self {
		Limit::Int(value)
	}
}

impl From<i32> for Limit {
	fn from(value: i32) -> Self {
		Limit::Int(i64::from(value))
	}
}

impl From<f64> for Limit {
	fn from(value: f64) -> Self {
		Limit::Float(value)
	}
}

impl From<&str> for Limit {
	fn from(value: &str) -> Self {
		Limit::Text(value.to_string())
	}
}

/// Where a field's options come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionsSource {
	/// Ordered option key to label mapping.
	Inline(IndexMap<String, String>),
	/// Name of a list resolved through an `OptionSupplier` when the field is
	/// added to a form.
	Named(String),
}

/// Type-specific configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeParams {
	/// Decimal separator for `float` fields; defaults to the translated
	/// `form.decimal_separator`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub decimal_separator: Option<String>,
	/// `chrono` format overriding the locale format of temporal fields.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<String>,
}

fn is_false(b: &bool) -> bool {
	!*b
}

/// The rule set of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
	/// Display name; translated through the message resolver.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub caption: Option<String>,
	#[serde(rename = "type")]
	pub field_type: FieldType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub type_params: Option<TypeParams>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options: Option<OptionsSource>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min: Option<Limit>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max: Option<Limit>,
	#[serde(default, skip_serializing_if = "is_false")]
	pub required: bool,
	/// Absent input is replaced by a type-appropriate default instead of
	/// being reported as missing.
	#[serde(default, skip_serializing_if = "is_false")]
	pub optional: bool,
	#[serde(default, skip_serializing_if = "is_false")]
	pub readonly: bool,
	#[serde(default, skip_serializing_if = "is_false")]
	pub hidden: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<FieldValue>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub regex: Option<String>,
	/// Name of another field this one must equal; prefix with `!` for "must
	/// differ".
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub matches: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub depends: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub depends_value: Option<FieldValue>,
	#[serde(default, skip_serializing_if = "is_false")]
	pub depends_value_empty: bool,
	#[serde(default, skip_serializing_if = "is_false")]
	pub depends_first_option: bool,
	#[serde(default, skip_serializing_if = "is_false")]
	pub depends_last_option: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	#[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
	pub tags: BTreeSet<String>,
}

impl FieldDefinition {
	/// Create a definition of the given type with no rules.
	///
	/// # Examples
	///
	/// ```
	/// use palisade_forms::{FieldDefinition, FieldType};
	///
	/// let field = FieldDefinition::new(FieldType::String)
	///     .required()
	///     .with_min(2)
	///     .with_max(10);
	/// assert!(field.required);
	/// assert!(!field.has_options());
	/// ```
	pub fn new(field_type: FieldType) -> Self {
		Self {
			caption: None,
			field_type,
			type_params: None,
			options: None,
			min: None,
			max: None,
			required: false,
			optional: false,
			readonly: false,
			hidden: false,
			default: None,
			regex: None,
			matches: None,
			depends: None,
			depends_value: None,
			depends_value_empty: false,
			depends_first_option: false,
			depends_last_option: false,
			page: None,
			tags: BTreeSet::new(),
		}
	}

	pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
		self.caption = Some(caption.into());
		self
	}

	pub fn with_type_params(mut self, params: TypeParams) -> Self {
		self.type_params = Some(params);
		self
	}

	pub fn with_options<K, V>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.options = Some(OptionsSource::Inline(
			options
				.into_iter()
				.map(|(key, label)| (key.into(), label.into()))
				.collect(),
		));
		self
	}

	pub fn with_option_list(mut self, list: impl Into<String>) -> Self {
		self.options = Some(OptionsSource::Named(list.into()));
		self
	}

	pub fn with_min(mut self, min: impl Into<Limit>) -> Self {
		self.min = Some(min.into());
		self
	}

	pub fn with_max(mut self, max: impl Into<Limit>) -> Self {
		self.max = Some(max.into());
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}

	pub fn readonly(mut self) -> Self {
		self.readonly = true;
		self
	}

	pub fn hidden(mut self) -> Self {
		self.hidden = true;
		self
	}

	pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
		self.regex = Some(pattern.into());
		self
	}

	/// Require equality with `other`; a leading `!` requires inequality.
	pub fn with_matches(mut self, other: impl Into<String>) -> Self {
		self.matches = Some(other.into());
		self
	}

	pub fn with_depends(mut self, other: impl Into<String>) -> Self {
		self.depends = Some(other.into());
		self
	}

	pub fn with_depends_value(mut self, value: impl Into<FieldValue>) -> Self {
		self.depends_value = Some(value.into());
		self
	}

	pub fn depends_value_empty(mut self) -> Self {
		self.depends_value_empty = true;
		self
	}

	pub fn depends_first_option(mut self) -> Self {
		self.depends_first_option = true;
		self
	}

	pub fn depends_last_option(mut self) -> Self {
		self.depends_last_option = true;
		self
	}

	pub fn with_page(mut self, page: u32) -> Self {
		self.page = Some(page);
		self
	}

	pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
		self.tags.insert(tag.into());
		self
	}

	pub fn has_options(&self) -> bool {
		self.options.is_some()
	}

	/// Resolved option map; `None` for undeclared or still unresolved named
	/// options.
	pub fn inline_options(&self) -> Option<&IndexMap<String, String>> {
		match &self.options {
			Some(OptionsSource::Inline(options)) => Some(options),
			_ => None,
		}
	}

	/// Page number; fields without a page belong to page 1.
	pub fn page_number(&self) -> u32 {
		self.page.unwrap_or(1)
	}

	/// The `matches` target and whether it is negated.
	pub fn matches_target(&self) -> Option<(&str, bool)> {
		let target = self.matches.as_deref()?;
		match target.strip_prefix('!') {
			Some(other) => Some((other, true)),
			None => Some((target, false)),
		}
	}

	/// Fields read by the `matches` and `depends` rules.
	pub fn references(&self) -> impl Iterator<Item = &str> {
		self.matches_target()
			.map(|(target, _)| target)
			.into_iter()
			.chain(self.depends.as_deref())
	}

	pub fn decimal_separator(&self) -> Option<&str> {
		self.type_params
			.as_ref()
			.and_then(|params| params.decimal_separator.as_deref())
	}

	pub fn format(&self) -> Option<&str> {
		self.type_params
			.as_ref()
			.and_then(|params| params.format.as_deref())
	}

	/// Value used when optional input is absent: an empty list for `list`,
	/// `false` for `bool`, otherwise the declared default.
	pub fn synthesized_default(&self) -> FieldValue {
		match self.field_type {
			FieldType::List => FieldValue::List(Vec::new()),
			FieldType::Bool => FieldValue::Bool(false),
			_ => self.default.clone().unwrap_or_default(),
		}
	}

	/// Reject definitions that cannot be evaluated.
	pub fn check(&self, name: &str) -> FormResult<()> {
		self.check_type_params(name)?;
		if let Some(pattern) = &self.regex {
			Regex::new(pattern).map_err(|source| FormError::InvalidRegex {
				field: name.to_string(),
				source,
			})?;
		}
		if let Some(min) = &self.min {
			self.check_limit(name, "min", min)?;
		}
		if let Some(max) = &self.max {
			self.check_limit(name, "max", max)?;
		}
		if self.depends_first_option && self.depends_last_option {
			return Err(FormError::ConflictingDependency(name.to_string()));
		}
		Ok(())
	}

	fn check_type_params(&self, name: &str) -> FormResult<()> {
		let Some(params) = &self.type_params else {
			return Ok(());
		};
		let invalid = |reason: String| FormError::InvalidTypeParams {
			field: name.to_string(),
			reason,
		};
		if let Some(separator) = &params.decimal_separator {
			if self.field_type != FieldType::Float {
				return Err(invalid(format!(
					"decimal_separator is not supported for type '{}'",
					self.field_type
				)));
			}
			let mut chars = separator.chars();
			match (chars.next(), chars.next()) {
				(Some(c), None) if !c.is_ascii_digit() && c != '-' => {}
				_ => {
					return Err(invalid(format!(
						"decimal_separator must be a single non-digit character, got '{}'",
						separator
					)));
				}
			}
		}
		if let Some(format) = &params.format {
			if !self.field_type.is_temporal() {
				return Err(invalid(format!(
					"format is not supported for type '{}'",
					self.field_type
				)));
			}
			if format.trim().is_empty() {
				return Err(invalid("format must not be empty".to_string()));
			}
		}
		Ok(())
	}

	fn check_limit(&self, name: &str, which: &'static str, limit: &Limit) -> FormResult<()> {
		let invalid = |reason: &str| FormError::InvalidBound {
			field: name.to_string(),
			which,
			reason: reason.to_string(),
		};
		if self.has_options() || self.field_type == FieldType::List {
			return limit
				.as_count()
				.map(|_| ())
				.ok_or_else(|| invalid("expected a non-negative integer count"));
		}
		match self.field_type {
			FieldType::Int | FieldType::Numeric | FieldType::Float => limit
				.as_number()
				.map(|_| ())
				.ok_or_else(|| invalid("expected a number")),
			FieldType::Date | FieldType::DateTime => match limit {
				Limit::Int(_) => Ok(()),
				Limit::Text(text) if validators::parse_absolute_bound(text).is_some() => Ok(()),
				_ => Err(invalid(
					"expected a day offset or an ISO date (YYYY-MM-DD[THH:MM:SS])",
				)),
			},
			FieldType::Time => match limit {
				Limit::Text(text) if validators::parse_time_bound(text).is_some() => Ok(()),
				_ => Err(invalid("expected a time (HH:MM[:SS])")),
			},
			_ => limit
				.as_count()
				.map(|_| ())
				.ok_or_else(|| invalid("expected a non-negative integer length")),
		}
	}
}

/// Ordered registry of field definitions.
///
/// Field order is validation order and therefore error order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDefinition {
	fields: IndexMap<String, FieldDefinition>,
}

impl FormDefinition {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style [`add`](Self::add).
	///
	/// # Examples
	///
	/// ```
	/// use palisade_forms::{FieldDefinition, FieldType, FormDefinition};
	///
	/// let definition = FormDefinition::new()
	///     .with_field("firstname", FieldDefinition::new(FieldType::String))
	///     .unwrap()
	///     .with_field("email", FieldDefinition::new(FieldType::Email))
	///     .unwrap();
	///
	/// assert_eq!(definition.names().collect::<Vec<_>>(), vec!["firstname", "email"]);
	/// assert!(definition
	///     .clone()
	///     .with_field("email", FieldDefinition::new(FieldType::Email))
	///     .is_err());
	/// ```
	pub fn with_field(
		mut self,
		name: impl Into<String>,
		definition: FieldDefinition,
	) -> FormResult<Self> {
		self.add(name, definition)?;
		Ok(self)
	}

	/// Append a field. Duplicate names and invalid definitions are rejected.
	pub fn add(&mut self, name: impl Into<String>, definition: FieldDefinition) -> FormResult<()> {
		let name = name.into();
		if self.fields.contains_key(&name) {
			return Err(FormError::DuplicateField(name));
		}
		definition.check(&name)?;
		self.fields.insert(name, definition);
		Ok(())
	}

	pub fn field(&self, name: &str) -> FormResult<&FieldDefinition> {
		self.fields
			.get(name)
			.ok_or_else(|| FormError::UnknownField(name.to_string()))
	}

	pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
		self.fields.get(name)
	}

	pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut FieldDefinition> {
		self.fields.get_mut(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
		self.fields.iter().map(|(name, def)| (name.as_str(), def))
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Return a new snapshot with `patch` applied to `name`.
	///
	/// # Examples
	///
	/// ```
	/// use palisade_forms::{FieldDefinition, FieldPatch, FieldType, FormDefinition, Limit, Patch};
	///
	/// let original = FormDefinition::new()
	///     .with_field("name", FieldDefinition::new(FieldType::String).with_max(10))
	///     .unwrap();
	///
	/// let patched = original
	///     .apply_patch("name", FieldPatch {
	///         max: Patch::Unset,
	///         required: Patch::Set(true),
	///         ..FieldPatch::default()
	///     })
	///     .unwrap();
	///
	/// assert_eq!(original.field("name").unwrap().max, Some(Limit::Int(10)));
	/// assert_eq!(patched.field("name").unwrap().max, None);
	/// assert!(patched.field("name").unwrap().required);
	/// ```
	pub fn apply_patch(&self, name: &str, patch: FieldPatch) -> FormResult<Self> {
		let mut next = self.clone();
		let field = next
			.fields
			.get_mut(name)
			.ok_or_else(|| FormError::UnknownField(name.to_string()))?;
		patch.apply(field);
		field.check(name)?;
		Ok(next)
	}

	/// Fail with the first `matches`/`depends` target that is not defined.
	pub fn check_references(&self) -> FormResult<()> {
		for field in self.fields.values() {
			if let Some(missing) = field.references().find(|target| !self.contains(target)) {
				return Err(FormError::UnknownField(missing.to_string()));
			}
		}
		Ok(())
	}

	/// First other field whose rules read `name`.
	pub fn referrer_of(&self, name: &str) -> Option<&str> {
		self.fields
			.iter()
			.find(|(other, field)| *other != name && field.references().any(|target| target == name))
			.map(|(other, _)| other.as_str())
	}

	/// Return a new snapshot without `name`.
	pub fn without_field(&self, name: &str) -> FormResult<Self> {
		let mut next = self.clone();
		next.fields
			.shift_remove(name)
			.ok_or_else(|| FormError::UnknownField(name.to_string()))?;
		Ok(next)
	}

	/// SHA-256 hex digest of the serialized definitions, for cache-keying
	/// identical rule sets.
	pub fn content_hash(&self) -> String {
		let canonical = serde_json::to_vec(&self.fields).unwrap_or_default();
		hex::encode(Sha256::digest(&canonical))
	}

	/// Definitions in the wire format read by client-side validators.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::to_value(&self.fields).unwrap_or(serde_json::Value::Null)
	}
}

/// A change to one property of a field definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
	Keep,
	Set(T),
	Unset,
}

impl<T> Default for Patch<T> {
	fn default() -> Self {
		Patch::Keep
	}
}

impl<T> Patch<T> {
	fn apply(self, target: &mut Option<T>) {
		match self {
			Patch::Keep => {}
			Patch::Set(value) => *target = Some(value),
			Patch::Unset => *target = None,
		}
	}
}

impl Patch<bool> {
	fn apply_flag(self, target: &mut bool) {
		match self {
			Patch::Keep => {}
			Patch::Set(value) => *target = value,
			Patch::Unset => *target = false,
		}
	}
}

/// Property changes for [`FormDefinition::apply_patch`]; `Keep` everywhere by
/// default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
	pub caption: Patch<String>,
	pub field_type: Option<FieldType>,
	pub type_params: Patch<TypeParams>,
	pub options: Patch<OptionsSource>,
	pub min: Patch<Limit>,
	pub max: Patch<Limit>,
	pub required: Patch<bool>,
	pub optional: Patch<bool>,
	pub readonly: Patch<bool>,
	pub hidden: Patch<bool>,
	pub default: Patch<FieldValue>,
	pub regex: Patch<String>,
	pub matches: Patch<String>,
	pub depends: Patch<String>,
	pub depends_value: Patch<FieldValue>,
	pub depends_value_empty: Patch<bool>,
	pub depends_first_option: Patch<bool>,
	pub depends_last_option: Patch<bool>,
	pub page: Patch<u32>,
	pub tags: Patch<BTreeSet<String>>,
}

impl FieldPatch {
	fn apply(self, field: &mut FieldDefinition) {
		self.caption.apply(&mut field.caption);
		if let Some(field_type) = self.field_type {
			field.field_type = field_type;
		}
		self.type_params.apply(&mut field.type_params);
		self.options.apply(&mut field.options);
		self.min.apply(&mut field.min);
		self.max.apply(&mut field.max);
		self.required.apply_flag(&mut field.required);
		self.optional.apply_flag(&mut field.optional);
		self.readonly.apply_flag(&mut field.readonly);
		self.hidden.apply_flag(&mut field.hidden);
		self.default.apply(&mut field.default);
		self.regex.apply(&mut field.regex);
		self.matches.apply(&mut field.matches);
		self.depends.apply(&mut field.depends);
		self.depends_value.apply(&mut field.depends_value);
		self.depends_value_empty
			.apply_flag(&mut field.depends_value_empty);
		self.depends_first_option
			.apply_flag(&mut field.depends_first_option);
		self.depends_last_option
			.apply_flag(&mut field.depends_last_option);
		self.page.apply(&mut field.page);
		match self.tags {
			Patch::Keep => {}
			Patch::Set(tags) => field.tags = tags,
			Patch::Unset => field.tags.clear(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_deserialize_field_dsl() {
		// Arrange
		let json = json!({
			"caption": "form.caption.country",
			"type": "string",
			"options": {"de": "Germany", "at": "Austria"},
			"required": true,
			"page": 2,
			"tags": ["address", "billing"]
		});

		// Act
		let field: FieldDefinition = serde_json::from_value(json).unwrap();

		// Assert
		assert_eq!(field.field_type, FieldType::String);
		assert!(field.required);
		assert_eq!(field.page_number(), 2);
		let options = field.inline_options().unwrap();
		assert_eq!(options.keys().collect::<Vec<_>>(), vec!["de", "at"]);
		assert!(field.tags.contains("billing"));
	}

	#[rstest]
	fn test_deserialize_bounds_and_named_options() {
		// Arrange
		let json = json!({"type": "list", "options": "countries", "min": 1, "max": 3});

		// Act
		let field: FieldDefinition = serde_json::from_value(json).unwrap();

		// Assert
		assert_eq!(field.options, Some(OptionsSource::Named("countries".to_string())));
		assert_eq!(field.min, Some(Limit::Int(1)));
		assert!(field.inline_options().is_none());
	}

	#[rstest]
	fn test_unknown_type_params_fail_to_parse() {
		// Arrange
		let json = json!({"type": "float", "type_params": {"thousands": "."}});

		// Act
		let result: Result<FieldDefinition, _> = serde_json::from_value(json);

		// Assert
		assert!(result.is_err());
	}

	#[rstest]
	fn test_serialization_skips_unset_properties() {
		// Arrange
		let field = FieldDefinition::new(FieldType::Int).with_min(1).required();

		// Act
		let json = serde_json::to_value(&field).unwrap();

		// Assert
		assert_eq!(json, json!({"type": "int", "min": 1, "required": true}));
	}

	#[rstest]
	#[case(FieldDefinition::new(FieldType::Float).with_type_params(TypeParams { decimal_separator: Some(",".into()), format: None }), true)]
	#[case(FieldDefinition::new(FieldType::Float).with_type_params(TypeParams { decimal_separator: Some(",,".into()), format: None }), false)]
	#[case(FieldDefinition::new(FieldType::Float).with_type_params(TypeParams { decimal_separator: Some("5".into()), format: None }), false)]
	#[case(FieldDefinition::new(FieldType::String).with_type_params(TypeParams { decimal_separator: Some(",".into()), format: None }), false)]
	#[case(FieldDefinition::new(FieldType::Date).with_type_params(TypeParams { decimal_separator: None, format: Some("%d/%m/%Y".into()) }), true)]
	#[case(FieldDefinition::new(FieldType::Int).with_type_params(TypeParams { decimal_separator: None, format: Some("%d".into()) }), false)]
	fn test_check_type_params(#[case] field: FieldDefinition, #[case] ok: bool) {
		// Act
		let result = field.check("f");

		// Assert
		assert_eq!(result.is_ok(), ok, "{:?}", result);
		if !ok {
			assert!(matches!(result, Err(FormError::InvalidTypeParams { .. })));
		}
	}

	#[rstest]
	#[case(FieldDefinition::new(FieldType::Numeric).with_min(29.9), true)]
	#[case(FieldDefinition::new(FieldType::Numeric).with_min("abc"), false)]
	#[case(FieldDefinition::new(FieldType::String).with_max(10), true)]
	#[case(FieldDefinition::new(FieldType::String).with_max(-1), false)]
	#[case(FieldDefinition::new(FieldType::String).with_max(2.5), false)]
	#[case(FieldDefinition::new(FieldType::List).with_max(2), true)]
	#[case(FieldDefinition::new(FieldType::Date).with_min(-30), true)]
	#[case(FieldDefinition::new(FieldType::Date).with_min("2024-01-01"), true)]
	#[case(FieldDefinition::new(FieldType::DateTime).with_max("2024-01-01T12:00:00"), true)]
	#[case(FieldDefinition::new(FieldType::Date).with_min("next week"), false)]
	#[case(FieldDefinition::new(FieldType::Time).with_min("08:00"), true)]
	#[case(FieldDefinition::new(FieldType::Time).with_min(3), false)]
	#[case(FieldDefinition::new(FieldType::Int).with_options([("1", "One")]).with_max(1.5), false)]
	fn test_check_bounds(#[case] field: FieldDefinition, #[case] ok: bool) {
		// Act
		let result = field.check("f");

		// Assert
		assert_eq!(result.is_ok(), ok, "{:?}", result);
	}

	#[rstest]
	fn test_check_rejects_invalid_regex_and_conflicting_dependency() {
		// Arrange
		let bad_regex = FieldDefinition::new(FieldType::String).with_regex("([a-z");
		let conflicting = FieldDefinition::new(FieldType::String)
			.with_depends("other")
			.depends_first_option()
			.depends_last_option();

		// Act & Assert
		assert!(matches!(bad_regex.check("code"), Err(FormError::InvalidRegex { .. })));
		assert!(matches!(
			conflicting.check("x"),
			Err(FormError::ConflictingDependency(name)) if name == "x"
		));
	}

	#[rstest]
	#[case(FieldType::List, FieldValue::List(vec![]))]
	#[case(FieldType::Bool, FieldValue::Bool(false))]
	#[case(FieldType::String, FieldValue::from("n/a"))]
	fn test_synthesized_default(#[case] ty: FieldType, #[case] expected: FieldValue) {
		// Arrange
		let field = FieldDefinition::new(ty).with_default("n/a");

		// Act & Assert
		assert_eq!(field.synthesized_default(), expected);
	}

	#[rstest]
	fn test_matches_target_negation() {
		// Arrange
		let same = FieldDefinition::new(FieldType::String).with_matches("password");
		let differ = FieldDefinition::new(FieldType::String).with_matches("!old_password");

		// Act & Assert
		assert_eq!(same.matches_target(), Some(("password", false)));
		assert_eq!(differ.matches_target(), Some(("old_password", true)));
	}

	#[rstest]
	fn test_apply_patch_leaves_snapshot_untouched_on_error() {
		// Arrange
		let definition = FormDefinition::new()
			.with_field("age", FieldDefinition::new(FieldType::Int).with_min(0))
			.unwrap();

		// Act
		let result = definition.apply_patch(
			"age",
			FieldPatch {
				min: Patch::Set(Limit::from("young")),
				..FieldPatch::default()
			},
		);
		let unknown = definition.apply_patch("height", FieldPatch::default());

		// Assert
		assert!(matches!(result, Err(FormError::InvalidBound { which: "min", .. })));
		assert!(matches!(unknown, Err(FormError::UnknownField(_))));
		assert_eq!(definition.field("age").unwrap().min, Some(Limit::Int(0)));
	}

	#[rstest]
	fn test_apply_patch_changes_type_and_tags() {
		// Arrange
		let definition = FormDefinition::new()
			.with_field(
				"contact",
				FieldDefinition::new(FieldType::String).with_tag("a"),
			)
			.unwrap();

		// Act
		let patched = definition
			.apply_patch(
				"contact",
				FieldPatch {
					field_type: Some(FieldType::Email),
					tags: Patch::Unset,
					..FieldPatch::default()
				},
			)
			.unwrap();

		// Assert
		let field = patched.field("contact").unwrap();
		assert_eq!(field.field_type, FieldType::Email);
		assert!(field.tags.is_empty());
	}

	#[rstest]
	fn test_without_field_preserves_order() {
		// Arrange
		let definition = FormDefinition::new()
			.with_field("a", FieldDefinition::new(FieldType::String))
			.unwrap()
			.with_field("b", FieldDefinition::new(FieldType::String))
			.unwrap()
			.with_field("c", FieldDefinition::new(FieldType::String))
			.unwrap();

		// Act
		let trimmed = definition.without_field("b").unwrap();

		// Assert
		assert_eq!(trimmed.names().collect::<Vec<_>>(), vec!["a", "c"]);
		assert_eq!(definition.len(), 3);
	}

	#[rstest]
	fn test_content_hash_tracks_definitions() {
		// Arrange
		let build = |max: i64| {
			FormDefinition::new()
				.with_field("name", FieldDefinition::new(FieldType::String).with_max(max))
				.unwrap()
		};

		// Act
		let a = build(10).content_hash();
		let b = build(10).content_hash();
		let c = build(11).content_hash();

		// Assert
		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(a.len(), 64);
	}
}
