//! Read-side projections and the client-side metadata export.

use crate::definition::FieldDefinition;
use crate::error::{FormError, FormResult};
use crate::form::Form;
use crate::session::ValidationState;
use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One field merged with its current value, for templates and APIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldExport {
	/// `<form id>-<field name>`, unique per form instance.
	pub id: String,
	pub name: String,
	/// Translated caption, or the field name.
	pub label: String,
	#[serde(flatten)]
	pub definition: FieldDefinition,
	pub value: FieldValue,
	/// Empty until the form has been validated.
	pub errors: Vec<String>,
}

/// Serializable form description for a client-side validator.
///
/// Carries the field rules in the same DSL the server evaluates, so a client
/// can give immediate feedback. Server-side validation stays mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMetadata {
	pub name: String,
	pub locale: String,
	/// Content hash of the field definitions, usable as a cache key.
	pub hash: String,
	pub fields: serde_json::Value,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub groups: IndexMap<String, Vec<String>>,
}

impl Form {
	/// Current values grouped by page number.
	pub fn values_by_page(&self) -> BTreeMap<u32, IndexMap<String, FieldValue>> {
		let mut pages: BTreeMap<u32, IndexMap<String, FieldValue>> = BTreeMap::new();
		for (name, field) in self.definition.iter() {
			pages
				.entry(field.page_number())
				.or_default()
				.insert(name.to_string(), self.values.resolve(name, field));
		}
		pages
	}

	/// Current values of the fields tagged with `tag`.
	pub fn values_by_tag(&self, tag: &str) -> IndexMap<String, FieldValue> {
		self.definition
			.iter()
			.filter(|(_, field)| field.tags.contains(tag))
			.map(|(name, field)| (name.to_string(), self.values.resolve(name, field)))
			.collect()
	}

	/// Every field with its definition, value, id and errors.
	pub fn as_array(&self) -> Vec<FieldExport> {
		self.definition
			.iter()
			.map(|(name, field)| self.export_field(name, field))
			.collect()
	}

	/// [`as_array`](Self::as_array) split by the groups set with
	/// [`set_groups`](Self::set_groups). Fields outside every group are left
	/// out.
	pub fn as_grouped_array(&self) -> FormResult<IndexMap<String, Vec<FieldExport>>> {
		self.groups
			.iter()
			.map(|(group, members)| {
				let fields = members
					.iter()
					.map(|name| {
						let field = self
							.definition
							.get(name)
							.ok_or_else(|| FormError::UnknownField(name.clone()))?;
						Ok(self.export_field(name, field))
					})
					.collect::<FormResult<Vec<_>>>()?;
				Ok((group.clone(), fields))
			})
			.collect()
	}

	/// Describe the form for a client-side validator.
	///
	/// # Examples
	///
	/// ```
	/// use palisade_forms::{FieldDefinition, FieldType, Form};
	/// use palisade_i18n::TranslationContext;
	/// use std::sync::Arc;
	///
	/// let mut form = Form::new("login", Arc::new(TranslationContext::with_defaults("de")));
	/// form.add_field("user", FieldDefinition::new(FieldType::String).required()).unwrap();
	///
	/// let metadata = form.to_metadata();
	/// assert_eq!(metadata.locale, "de");
	/// assert_eq!(metadata.fields["user"]["required"], true);
	/// assert_eq!(metadata.hash, form.content_hash());
	/// ```
	pub fn to_metadata(&self) -> FormMetadata {
		FormMetadata {
			name: self.name().to_string(),
			locale: self.locale(),
			hash: self.content_hash(),
			fields: self.definition.to_json(),
			groups: self.groups.clone(),
		}
	}

	fn export_field(&self, name: &str, field: &FieldDefinition) -> FieldExport {
		let errors = match self.state {
			ValidationState::Validated => self
				.errors
				.get(name)
				.map(<[String]>::to_vec)
				.unwrap_or_default(),
			ValidationState::Unvalidated => Vec::new(),
		};
		FieldExport {
			id: format!("{}-{}", self.id(), name),
			name: name.to_string(),
			label: crate::rules::caption_of(self.translator.as_ref(), name, field),
			definition: field.clone(),
			value: self.values.resolve(name, field),
			errors,
		}
	}
}
