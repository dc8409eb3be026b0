use crate::definition::{FieldDefinition, FieldPatch, FormDefinition, OptionsSource};
use crate::error::{FormError, FormResult};
use crate::options::OptionSupplier;
use crate::rules::caption_of;
use crate::session::{ErrorCollector, ValidationState};
use crate::store::ValueStore;
use chrono::{Local, NaiveDateTime};
use indexmap::IndexMap;
use palisade_i18n::Translator;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A form instance: field definitions, current values, collected errors and
/// the validation session.
///
/// One instance serves one submission. It is not meant to be shared between
/// concurrent requests.
///
/// # Examples
///
/// ```
/// use palisade_forms::{FieldDefinition, FieldType, Form};
/// use palisade_i18n::TranslationContext;
/// use std::sync::Arc;
///
/// let mut form = Form::new("signup", Arc::new(TranslationContext::with_defaults("en")));
/// form.add_field("email", FieldDefinition::new(FieldType::Email).required()).unwrap();
///
/// form.set_value("email", "xyz").unwrap();
/// form.validate().unwrap();
///
/// assert!(!form.is_valid().unwrap());
/// assert_eq!(
///     form.first_error().unwrap(),
///     Some("email must be a valid email address.")
/// );
/// ```
pub struct Form {
	name: String,
	id: Uuid,
	pub(crate) definition: FormDefinition,
	pub(crate) values: ValueStore,
	pub(crate) errors: ErrorCollector,
	pub(crate) state: ValidationState,
	pub(crate) groups: IndexMap<String, Vec<String>>,
	pub(crate) translator: Arc<dyn Translator>,
	option_supplier: Option<Arc<dyn OptionSupplier>>,
	reference_time: Option<NaiveDateTime>,
}

impl Form {
	pub fn new(name: impl Into<String>, translator: Arc<dyn Translator>) -> Self {
		Self {
			name: name.into(),
			id: Uuid::new_v4(),
			definition: FormDefinition::new(),
			values: ValueStore::default(),
			errors: ErrorCollector::default(),
			state: ValidationState::default(),
			groups: IndexMap::new(),
			translator,
			option_supplier: None,
			reference_time: None,
		}
	}

	/// Supplier used to resolve `options = "<list name>"`.
	pub fn with_option_supplier(mut self, supplier: Arc<dyn OptionSupplier>) -> Self {
		self.option_supplier = Some(supplier);
		self
	}

	/// Fix "now" for day-offset date bounds.
	pub fn with_reference_time(mut self, now: NaiveDateTime) -> Self {
		self.reference_time = Some(now);
		self
	}

	/// Add every field of `definition`, in order.
	pub fn with_definition(mut self, definition: FormDefinition) -> FormResult<Self> {
		for (name, field) in definition.iter() {
			let mut field = field.clone();
			self.resolve_options(name, &mut field)?;
			self.definition.add(name, field)?;
		}
		// Targets may be declared after the fields reading them.
		self.definition.check_references()?;
		self.invalidate();
		tracing::debug!(form = %self.name, fields = self.definition.len(), "definition loaded");
		Ok(self)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Instance id, used as prefix of exported field ids.
	pub fn id(&self) -> Uuid {
		self.id
	}

	pub fn definition(&self) -> &FormDefinition {
		&self.definition
	}

	pub fn translator(&self) -> &Arc<dyn Translator> {
		&self.translator
	}

	pub fn locale(&self) -> String {
		self.translator.locale()
	}

	pub(crate) fn now(&self) -> NaiveDateTime {
		self.reference_time
			.unwrap_or_else(|| Local::now().naive_local())
	}

	/// Append a field definition. Named option lists are resolved here.
	pub fn add_field(&mut self, name: impl Into<String>, mut field: FieldDefinition) -> FormResult<()> {
		let name = name.into();
		if let Some(missing) = field
			.references()
			.find(|target| *target != name && !self.definition.contains(target))
		{
			return Err(FormError::UnknownField(missing.to_string()));
		}
		self.resolve_options(&name, &mut field)?;
		self.definition.add(name.clone(), field)?;
		self.invalidate();
		tracing::debug!(form = %self.name, field = %name, "field added");
		Ok(())
	}

	/// Replace the definition of `name` with a patched copy.
	///
	/// The form keeps its previous definition when the patch is rejected.
	pub fn change_definition(&mut self, name: &str, patch: FieldPatch) -> FormResult<()> {
		let mut next = self.definition.apply_patch(name, patch)?;
		if let Some(field) = next.get_mut(name) {
			self.resolve_options(name, field)?;
		}
		next.check_references()?;
		self.definition = next;
		self.invalidate();
		tracing::debug!(form = %self.name, field = %name, "field definition changed");
		Ok(())
	}

	/// Drop a field together with its value and group memberships.
	///
	/// Fails while another field still `matches` or `depends` on it.
	pub fn remove_field(&mut self, name: &str) -> FormResult<()> {
		if let Some(by) = self.definition.referrer_of(name) {
			return Err(FormError::ReferencedField {
				field: name.to_string(),
				by: by.to_string(),
			});
		}
		self.definition = self.definition.without_field(name)?;
		self.values.remove(name);
		for members in self.groups.values_mut() {
			members.retain(|member| member != name);
		}
		self.invalidate();
		tracing::debug!(form = %self.name, field = %name, "field removed");
		Ok(())
	}

	/// Set the group membership lists used by
	/// [`as_grouped_array`](Self::as_grouped_array).
	pub fn set_groups<G, N>(&mut self, groups: impl IntoIterator<Item = (G, Vec<N>)>) -> FormResult<()>
	where
		G: Into<String>,
		N: Into<String>,
	{
		let mut resolved = IndexMap::new();
		for (group, members) in groups {
			let members: Vec<String> = members.into_iter().map(Into::into).collect();
			if let Some(unknown) = members.iter().find(|m| !self.definition.contains(m)) {
				return Err(FormError::UnknownField(unknown.clone()));
			}
			resolved.insert(group.into(), members);
		}
		self.groups = resolved;
		Ok(())
	}

	pub fn groups(&self) -> &IndexMap<String, Vec<String>> {
		&self.groups
	}

	/// Translated caption of `name`, or the name itself without a caption.
	pub fn caption(&self, name: &str) -> FormResult<String> {
		let field = self.definition.field(name)?;
		Ok(caption_of(self.translator.as_ref(), name, field))
	}

	/// Digest of the field definitions; equal for forms with identical rules.
	pub fn content_hash(&self) -> String {
		self.definition.content_hash()
	}

	fn resolve_options(&self, name: &str, field: &mut FieldDefinition) -> FormResult<()> {
		let Some(OptionsSource::Named(list)) = &field.options else {
			return Ok(());
		};
		let resolved = self
			.option_supplier
			.as_ref()
			.and_then(|supplier| supplier.get(list))
			.ok_or_else(|| FormError::UnknownOptionList {
				field: name.to_string(),
				list: list.clone(),
			})?;
		field.options = Some(OptionsSource::Inline(resolved));
		Ok(())
	}

	/// Drop collected errors and return to the unvalidated state.
	pub(crate) fn invalidate(&mut self) {
		self.errors.clear();
		self.state = ValidationState::Unvalidated;
	}
}

impl fmt::Debug for Form {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Form")
			.field("name", &self.name)
			.field("id", &self.id)
			.field("locale", &self.translator.locale())
			.field("fields", &self.definition.len())
			.field("state", &self.state)
			.field("errors", &self.errors)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::definition::{Limit, Patch};
	use crate::field_type::FieldType;
	use crate::options::StaticOptions;
	use palisade_i18n::TranslationContext;
	use rstest::{fixture, rstest};

	#[fixture]
	fn form() -> Form {
		Form::new("contact", Arc::new(TranslationContext::with_defaults("en")))
	}

	#[rstest]
	fn test_add_field_resolves_named_options(form: Form) {
		// Arrange
		let supplier = StaticOptions::new().with_list("salutation", [("mr", "Mr."), ("ms", "Ms.")]);
		let mut form = form.with_option_supplier(Arc::new(supplier));

		// Act
		form.add_field(
			"salutation",
			FieldDefinition::new(FieldType::String).with_option_list("salutation"),
		)
		.unwrap();

		// Assert
		let options = form
			.definition()
			.field("salutation")
			.unwrap()
			.inline_options()
			.unwrap();
		assert_eq!(options.len(), 2);
	}

	#[rstest]
	fn test_add_field_without_supplier_fails_for_named_options(mut form: Form) {
		// Act
		let result = form.add_field(
			"country",
			FieldDefinition::new(FieldType::String).with_option_list("countries"),
		);

		// Assert
		assert!(matches!(
			result,
			Err(FormError::UnknownOptionList { list, .. }) if list == "countries"
		));
		assert!(form.definition().is_empty());
	}

	#[rstest]
	fn test_duplicate_field_is_rejected(mut form: Form) {
		// Arrange
		form.add_field("email", FieldDefinition::new(FieldType::Email))
			.unwrap();

		// Act
		let result = form.add_field("email", FieldDefinition::new(FieldType::String));

		// Assert
		assert!(matches!(result, Err(FormError::DuplicateField(name)) if name == "email"));
	}

	#[rstest]
	fn test_change_definition_keeps_previous_on_error(mut form: Form) {
		// Arrange
		form.add_field("name", FieldDefinition::new(FieldType::String).with_max(10))
			.unwrap();
		let hash = form.content_hash();

		// Act
		let result = form.change_definition(
			"name",
			FieldPatch {
				regex: Patch::Set("(".to_string()),
				..FieldPatch::default()
			},
		);

		// Assert
		assert!(result.is_err());
		assert_eq!(form.content_hash(), hash);
		assert_eq!(
			form.definition().field("name").unwrap().max,
			Some(Limit::Int(10))
		);
	}

	#[rstest]
	fn test_remove_field_drops_value_and_group_membership(mut form: Form) {
		// Arrange
		form.add_field("a", FieldDefinition::new(FieldType::String)).unwrap();
		form.add_field("b", FieldDefinition::new(FieldType::String)).unwrap();
		form.set_groups([("main", vec!["a", "b"])]).unwrap();
		form.set_value("a", "x").unwrap();

		// Act
		form.remove_field("a").unwrap();

		// Assert
		assert!(form.value("a").is_err());
		assert_eq!(form.groups()["main"], vec!["b".to_string()]);
	}

	#[rstest]
	#[case(FieldDefinition::new(FieldType::String).with_depends("missing"))]
	#[case(FieldDefinition::new(FieldType::String).with_matches("missing"))]
	#[case(FieldDefinition::new(FieldType::String).with_matches("!missing"))]
	fn test_add_field_rejects_undefined_reference(mut form: Form, #[case] field: FieldDefinition) {
		// Act
		let result = form.add_field("b", field);

		// Assert
		assert!(matches!(result, Err(FormError::UnknownField(name)) if name == "missing"));
		assert!(form.definition().is_empty());
	}

	#[rstest]
	fn test_change_definition_rejects_undefined_reference(mut form: Form) {
		// Arrange
		form.add_field("a", FieldDefinition::new(FieldType::String)).unwrap();
		let hash = form.content_hash();

		// Act
		let result = form.change_definition(
			"a",
			FieldPatch {
				depends: Patch::Set("missing".to_string()),
				..FieldPatch::default()
			},
		);

		// Assert
		assert!(matches!(result, Err(FormError::UnknownField(name)) if name == "missing"));
		assert_eq!(form.content_hash(), hash);
	}

	#[rstest]
	fn test_remove_field_rejects_referenced_field(mut form: Form) {
		// Arrange
		form.add_field("phone", FieldDefinition::new(FieldType::String)).unwrap();
		form.add_field(
			"email",
			FieldDefinition::new(FieldType::String).with_depends("phone"),
		)
		.unwrap();

		// Act
		let result = form.remove_field("phone");

		// Assert
		assert!(matches!(
			result,
			Err(FormError::ReferencedField { field, by }) if field == "phone" && by == "email"
		));
		assert!(form.definition().contains("phone"));
		form.remove_field("email").unwrap();
		form.remove_field("phone").unwrap();
		assert!(form.definition().is_empty());
	}

	#[rstest]
	fn test_with_definition_accepts_forward_reference(form: Form) {
		// Arrange
		let definition = FormDefinition::new()
			.with_field(
				"confirm",
				FieldDefinition::new(FieldType::String).with_matches("password"),
			)
			.unwrap()
			.with_field("password", FieldDefinition::new(FieldType::String))
			.unwrap();

		// Act
		let form = form.with_definition(definition).unwrap();

		// Assert
		assert_eq!(form.definition().names().collect::<Vec<_>>(), ["confirm", "password"]);
	}

	#[rstest]
	fn test_with_definition_rejects_dangling_reference(form: Form) {
		// Arrange
		let definition = FormDefinition::new()
			.with_field(
				"email",
				FieldDefinition::new(FieldType::String).with_depends("phone"),
			)
			.unwrap();

		// Act
		let result = form.with_definition(definition);

		// Assert
		assert!(matches!(result, Err(FormError::UnknownField(name)) if name == "phone"));
	}

	#[rstest]
	fn test_set_groups_rejects_unknown_member(mut form: Form) {
		// Arrange
		form.add_field("a", FieldDefinition::new(FieldType::String)).unwrap();

		// Act
		let result = form.set_groups([("main", vec!["a", "zzz"])]);

		// Assert
		assert!(matches!(result, Err(FormError::UnknownField(name)) if name == "zzz"));
	}

	#[rstest]
	fn test_caption_translates_or_falls_back_to_name(mut form: Form) {
		// Arrange
		form.add_field(
			"email",
			FieldDefinition::new(FieldType::Email).with_caption("E-mail address"),
		)
		.unwrap();
		form.add_field("phone", FieldDefinition::new(FieldType::String))
			.unwrap();

		// Act & Assert
		assert_eq!(form.caption("email").unwrap(), "E-mail address");
		assert_eq!(form.caption("phone").unwrap(), "phone");
		assert!(form.caption("fax").is_err());
	}
}
