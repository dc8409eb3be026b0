//! The validation session and the error collector.

use crate::error::{FormError, FormResult};
use crate::form::Form;
use crate::rules::RuleContext;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether the current values have been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationState {
	#[default]
	Unvalidated,
	Validated,
}

/// Localized error messages per field, in validation order.
///
/// Only fields with at least one error have an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorCollector {
	errors: IndexMap<String, Vec<String>>,
}

impl ErrorCollector {
	/// Record the errors of one field; an empty list records nothing.
	pub fn extend(&mut self, field: &str, messages: Vec<String>) {
		if messages.is_empty() {
			return;
		}
		self.errors
			.entry(field.to_string())
			.or_default()
			.extend(messages);
	}

	pub fn add(&mut self, field: &str, message: impl Into<String>) {
		self.extend(field, vec![message.into()]);
	}

	pub fn get(&self, field: &str) -> Option<&[String]> {
		self.errors.get(field).map(Vec::as_slice)
	}

	/// First error of the first field that has one.
	pub fn first(&self) -> Option<&str> {
		self.errors
			.values()
			.next()
			.and_then(|messages| messages.first())
			.map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	/// Number of fields with errors.
	pub fn len(&self) -> usize {
		self.errors.len()
	}

	/// Number of messages across all fields.
	pub fn total(&self) -> usize {
		self.errors.values().map(Vec::len).sum()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.errors
			.iter()
			.map(|(field, messages)| (field.as_str(), messages.as_slice()))
	}

	pub fn as_map(&self) -> &IndexMap<String, Vec<String>> {
		&self.errors
	}

	pub fn clear(&mut self) {
		self.errors.clear();
	}
}

impl Form {
	/// Run every rule for every field, in definition order.
	///
	/// Returns whether the values are valid. Validating again requires
	/// [`clear_errors`](Self::clear_errors) or a new write.
	pub fn validate(&mut self) -> FormResult<bool> {
		if self.state == ValidationState::Validated {
			return Err(FormError::AlreadyValidated);
		}

		let ctx = RuleContext {
			definition: &self.definition,
			values: &self.values,
			translator: self.translator.as_ref(),
			now: self.now(),
		};
		let mut collected = ErrorCollector::default();
		for name in self.definition.names() {
			if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
				return Err(FormError::NumericFieldName(name.to_string()));
			}
			collected.extend(name, ctx.evaluate(name)?);
		}

		tracing::debug!(
			form = %self.name(),
			fields = self.definition.len(),
			errors = collected.total(),
			"form validated"
		);
		self.errors = collected;
		self.state = ValidationState::Validated;
		Ok(self.errors.is_empty())
	}

	/// Empty the collected errors and allow validating again.
	pub fn clear_errors(&mut self) {
		self.errors.clear();
		self.state = ValidationState::Unvalidated;
	}

	pub fn state(&self) -> ValidationState {
		self.state
	}

	fn validated_errors(&self) -> FormResult<&ErrorCollector> {
		match self.state {
			ValidationState::Validated => Ok(&self.errors),
			ValidationState::Unvalidated => Err(FormError::NotValidated),
		}
	}

	pub fn errors(&self) -> FormResult<&IndexMap<String, Vec<String>>> {
		Ok(self.validated_errors()?.as_map())
	}

	/// Errors of one field; empty when it passed.
	pub fn field_errors(&self, name: &str) -> FormResult<&[String]> {
		let errors = self.validated_errors()?;
		self.definition.field(name)?;
		Ok(errors.get(name).unwrap_or_default())
	}

	pub fn has_errors(&self) -> FormResult<bool> {
		Ok(!self.validated_errors()?.is_empty())
	}

	pub fn is_valid(&self) -> FormResult<bool> {
		Ok(self.validated_errors()?.is_empty())
	}

	pub fn first_error(&self) -> FormResult<Option<&str>> {
		Ok(self.validated_errors()?.first())
	}

	/// Errors as an indented listing, one block per field headed by its
	/// caption.
	///
	/// ```text
	/// First name:
	///   First name must be at least 2 characters long.
	/// ```
	pub fn errors_as_text(&self) -> FormResult<String> {
		let mut text = String::new();
		for (name, messages) in self.validated_errors()?.iter() {
			let caption = self.caption(name)?;
			text.push_str(&format!("{}:\n", caption));
			for message in messages {
				text.push_str(&format!("  {}\n", message));
			}
		}
		Ok(text)
	}

	/// Errors grouped by the page of their field.
	pub fn errors_by_page(&self) -> FormResult<BTreeMap<u32, IndexMap<String, Vec<String>>>> {
		let mut pages: BTreeMap<u32, IndexMap<String, Vec<String>>> = BTreeMap::new();
		for (name, messages) in self.validated_errors()?.iter() {
			let page = self.definition.field(name)?.page_number();
			pages
				.entry(page)
				.or_default()
				.insert(name.to_string(), messages.to_vec());
		}
		Ok(pages)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::definition::FieldDefinition;
	use crate::field_type::FieldType;
	use palisade_i18n::TranslationContext;
	use rstest::{fixture, rstest};
	use std::sync::Arc;

	#[fixture]
	fn form() -> Form {
		let mut form = Form::new("wizard", Arc::new(TranslationContext::with_defaults("en")));
		form.add_field(
			"firstname",
			FieldDefinition::new(FieldType::String)
				.with_caption("First name")
				.required()
				.with_min(2),
		)
		.unwrap();
		form.add_field(
			"email",
			FieldDefinition::new(FieldType::Email).required().with_page(2),
		)
		.unwrap();
		form
	}

	#[rstest]
	fn test_reading_errors_before_validate_fails(form: Form) {
		// Act & Assert
		assert!(matches!(form.errors(), Err(FormError::NotValidated)));
		assert!(matches!(form.is_valid(), Err(FormError::NotValidated)));
		assert!(matches!(form.first_error(), Err(FormError::NotValidated)));
	}

	#[rstest]
	fn test_validate_twice_fails_until_cleared(mut form: Form) {
		// Arrange
		form.validate().unwrap();

		// Act
		let second = form.validate();
		form.clear_errors();
		let third = form.validate();

		// Assert
		assert!(matches!(second, Err(FormError::AlreadyValidated)));
		assert!(third.is_ok());
	}

	#[rstest]
	fn test_first_error_follows_definition_order(mut form: Form) {
		// Act
		let valid = form.validate().unwrap();

		// Assert
		assert!(!valid);
		assert!(form.has_errors().unwrap());
		assert_eq!(form.first_error().unwrap(), Some("First name is required."));
		assert_eq!(form.errors().unwrap().len(), 2);
	}

	#[rstest]
	fn test_field_errors(mut form: Form) {
		// Arrange
		form.set_value("firstname", "Al").unwrap();
		form.validate().unwrap();

		// Act & Assert
		assert!(form.field_errors("firstname").unwrap().is_empty());
		assert_eq!(form.field_errors("email").unwrap().len(), 1);
		assert!(matches!(form.field_errors("phone"), Err(FormError::UnknownField(_))));
	}

	#[rstest]
	fn test_errors_as_text(mut form: Form) {
		// Arrange
		form.set_value("firstname", "A").unwrap();
		form.set_value("email", "a@example.com").unwrap();
		form.validate().unwrap();

		// Act
		let text = form.errors_as_text().unwrap();

		// Assert
		assert_eq!(
			text,
			"First name:\n  First name must be at least 2 characters long.\n"
		);
	}

	#[rstest]
	fn test_errors_by_page(mut form: Form) {
		// Arrange
		form.validate().unwrap();

		// Act
		let pages = form.errors_by_page().unwrap();

		// Assert
		assert_eq!(pages.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
		assert!(pages[&1].contains_key("firstname"));
		assert!(pages[&2].contains_key("email"));
	}

	#[rstest]
	fn test_numeric_field_name_is_fatal() {
		// Arrange
		let mut form = Form::new("typo", Arc::new(TranslationContext::with_defaults("en")));
		form.add_field("0", FieldDefinition::new(FieldType::String))
			.unwrap();

		// Act
		let result = form.validate();

		// Assert
		assert!(matches!(result, Err(FormError::NumericFieldName(name)) if name == "0"));
		assert_eq!(form.state(), ValidationState::Unvalidated);
	}

	#[rstest]
	fn test_collector_skips_empty_lists() {
		// Arrange
		let mut collector = ErrorCollector::default();

		// Act
		collector.extend("a", vec![]);
		collector.add("b", "oops");
		collector.add("b", "again");

		// Assert
		assert_eq!(collector.len(), 1);
		assert_eq!(collector.total(), 2);
		assert_eq!(collector.first(), Some("oops"));
	}
}
