//! Value store and the write operations of [`Form`].

use crate::coerce::coerce;
use crate::definition::FieldDefinition;
use crate::error::{FormError, FormResult};
use crate::form::Form;
use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::Serialize;

/// Coerced field values keyed by field name.
///
/// Only names present in the form's definition are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueStore {
	values: IndexMap<String, FieldValue>,
}

impl ValueStore {
	pub fn get(&self, name: &str) -> Option<&FieldValue> {
		self.values.get(name)
	}

	/// Stored value, else the declared default, else null.
	pub fn resolve(&self, name: &str, definition: &FieldDefinition) -> FieldValue {
		self.values
			.get(name)
			.or(definition.default.as_ref())
			.cloned()
			.unwrap_or_default()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
		self.values.iter().map(|(name, value)| (name.as_str(), value))
	}

	pub(crate) fn insert(&mut self, name: String, value: FieldValue) {
		self.values.insert(name, value);
	}

	pub(crate) fn remove(&mut self, name: &str) -> Option<FieldValue> {
		self.values.shift_remove(name)
	}

	pub(crate) fn clear(&mut self) {
		self.values.clear();
	}
}

fn collect_input<K, V>(input: impl IntoIterator<Item = (K, V)>) -> IndexMap<String, FieldValue>
where
	K: Into<String>,
	V: Into<FieldValue>,
{
	input
		.into_iter()
		.map(|(name, value)| (name.into(), value.into()))
		.collect()
}

impl Form {
	/// Coerce and store one value. Undefined names are rejected.
	pub fn set_value(&mut self, name: &str, raw: impl Into<FieldValue>) -> FormResult<()> {
		let field = self.definition.field(name)?;
		let value = coerce(field, raw.into(), self.translator.as_ref());
		self.values.insert(name.to_string(), value);
		self.invalidate();
		Ok(())
	}

	/// Write every input entry. Nothing is written when any key is undefined.
	///
	/// # Examples
	///
	/// ```
	/// use palisade_forms::{FieldDefinition, FieldType, FieldValue, Form};
	/// use palisade_i18n::TranslationContext;
	/// use std::sync::Arc;
	///
	/// let mut form = Form::new("f", Arc::new(TranslationContext::with_defaults("en")));
	/// form.add_field("newsletter", FieldDefinition::new(FieldType::Bool)).unwrap();
	///
	/// form.set_values([("newsletter", "yes")]).unwrap();
	/// assert_eq!(form.value("newsletter").unwrap(), FieldValue::Bool(true));
	///
	/// assert!(form.set_values([("newsletter", "no"), ("spam", "1")]).is_err());
	/// assert_eq!(form.value("newsletter").unwrap(), FieldValue::Bool(true));
	/// ```
	pub fn set_values<K, V>(&mut self, input: impl IntoIterator<Item = (K, V)>) -> FormResult<()>
	where
		K: Into<String>,
		V: Into<FieldValue>,
	{
		let input = collect_input(input);
		if let Some(unknown) = input.keys().find(|name| !self.definition.contains(name)) {
			return Err(FormError::UnknownField(unknown.clone()));
		}
		self.write_all(input);
		Ok(())
	}

	/// Write a value for every defined field. Optional fields missing from the
	/// input get their synthesized default; any other missing field is an
	/// error and nothing is written.
	pub fn set_defined_values<K, V>(&mut self, input: impl IntoIterator<Item = (K, V)>) -> FormResult<()>
	where
		K: Into<String>,
		V: Into<FieldValue>,
	{
		self.set_defined_where(collect_input(input), |_| true)
	}

	/// [`set_defined_values`](Self::set_defined_values) restricted to
	/// writable fields.
	pub fn set_defined_writable_values<K, V>(
		&mut self,
		input: impl IntoIterator<Item = (K, V)>,
	) -> FormResult<()>
	where
		K: Into<String>,
		V: Into<FieldValue>,
	{
		self.set_defined_where(collect_input(input), |field| !field.readonly)
	}

	/// [`set_defined_writable_values`](Self::set_defined_writable_values)
	/// restricted to the fields of one page.
	pub fn set_writable_values_on_page<K, V>(
		&mut self,
		input: impl IntoIterator<Item = (K, V)>,
		page: u32,
	) -> FormResult<()>
	where
		K: Into<String>,
		V: Into<FieldValue>,
	{
		self.set_defined_where(collect_input(input), |field| {
			!field.readonly && field.page_number() == page
		})
	}

	/// Write the input entries of writable fields and skip everything else.
	pub fn set_writable_values<K, V>(&mut self, input: impl IntoIterator<Item = (K, V)>)
	where
		K: Into<String>,
		V: Into<FieldValue>,
	{
		let input = collect_input(input);
		let writable = input
			.into_iter()
			.filter(|(name, _)| match self.definition.get(name) {
				Some(field) => !field.readonly,
				None => {
					tracing::trace!(form = %self.name(), field = %name, "skipping undefined field");
					false
				}
			})
			.collect();
		self.write_all(writable);
	}

	/// Current value, or the declared default when never written.
	pub fn value(&self, name: &str) -> FormResult<FieldValue> {
		let field = self.definition.field(name)?;
		Ok(self.values.resolve(name, field))
	}

	/// Current values of all defined fields, in definition order.
	pub fn values(&self) -> IndexMap<String, FieldValue> {
		self.definition
			.iter()
			.map(|(name, field)| (name.to_string(), self.values.resolve(name, field)))
			.collect()
	}

	pub fn value_store(&self) -> &ValueStore {
		&self.values
	}

	pub fn is_writable(&self, name: &str) -> FormResult<bool> {
		Ok(!self.definition.field(name)?.readonly)
	}

	pub fn is_optional(&self, name: &str) -> FormResult<bool> {
		Ok(self.definition.field(name)?.optional)
	}

	/// Forget all written values.
	pub fn clear_values(&mut self) {
		self.values.clear();
		self.invalidate();
	}

	fn set_defined_where(
		&mut self,
		mut input: IndexMap<String, FieldValue>,
		include: impl Fn(&FieldDefinition) -> bool,
	) -> FormResult<()> {
		let mut selected = IndexMap::new();
		for (name, field) in self.definition.iter().filter(|(_, field)| include(field)) {
			let value = match input.shift_remove(name) {
				Some(value) => value,
				None if field.optional => field.synthesized_default(),
				None => return Err(FormError::MissingValue(name.to_string())),
			};
			selected.insert(name.to_string(), value);
		}
		self.write_all(selected);
		Ok(())
	}

	/// Coerce and store entries whose names are known to be defined.
	fn write_all(&mut self, input: IndexMap<String, FieldValue>) {
		for (name, raw) in input {
			if let Some(field) = self.definition.get(&name) {
				let value = coerce(field, raw, self.translator.as_ref());
				self.values.insert(name, value);
			}
		}
		self.invalidate();
	}
}
