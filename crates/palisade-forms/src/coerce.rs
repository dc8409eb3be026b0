//! Write-time coercion of raw input into field values.

use crate::definition::FieldDefinition;
use crate::field_type::FieldType;
use crate::validators;
use crate::value::FieldValue;
use palisade_i18n::Translator;

/// Coerce `raw` for storage in a field described by `definition`.
///
/// Steps run in a fixed order:
///
/// 1. `list`: `[""]` becomes `[]`.
/// 2. `bool`: mapped through [`coerce_bool`].
/// 3. temporal types: non-empty scalars are parsed with the field's format
///    (or the locale's `form.date`/`form.datetime`/`form.time`), then ISO.
///    Unparseable input is kept as-is for the type rule to report.
/// 4. any type but `string`: `""` becomes null.
pub fn coerce(definition: &FieldDefinition, raw: FieldValue, translator: &dyn Translator) -> FieldValue {
	let field_type = definition.field_type;
	let mut value = raw;

	if field_type == FieldType::List
		&& let FieldValue::List(items) = &value
		&& items.len() == 1
		&& items[0] == FieldValue::String(String::new())
	{
		value = FieldValue::List(Vec::new());
	}

	if field_type == FieldType::Bool {
		value = FieldValue::Bool(coerce_bool(&value));
	}

	if field_type.is_temporal() && value.is_scalar() && !value.is_empty() {
		value = parse_temporal_value(definition, value, translator);
	}

	if field_type != FieldType::String && value == FieldValue::String(String::new()) {
		value = FieldValue::Null;
	}

	value
}

/// Boolean coercion table.
///
/// | input | result |
/// |---|---|
/// | `true` / `false` | unchanged |
/// | list or map | non-empty |
/// | `"1"`, `"yes"`, `"true"` | `true` |
/// | `"0"`, `"no"`, `"false"` | `false` |
/// | anything else | truthiness of the string form |
///
/// String matching ignores case and surrounding whitespace.
///
/// # Examples
///
/// ```
/// use palisade_forms::{coerce_bool, FieldValue};
///
/// assert!(coerce_bool(&FieldValue::from("Yes")));
/// assert!(!coerce_bool(&FieldValue::from("false")));
/// assert!(!coerce_bool(&FieldValue::from("")));
/// assert!(coerce_bool(&FieldValue::from("off")));
/// assert!(!coerce_bool(&FieldValue::List(vec![])));
/// ```
pub fn coerce_bool(value: &FieldValue) -> bool {
	match value {
		FieldValue::Bool(b) => *b,
		FieldValue::List(items) => !items.is_empty(),
		FieldValue::Map(entries) => !entries.is_empty(),
		other => {
			let text = other.to_string();
			match text.trim().to_lowercase().as_str() {
				"1" | "yes" | "true" => true,
				"0" | "no" | "false" => false,
				_ => other.truthy(),
			}
		}
	}
}

fn parse_temporal_value(
	definition: &FieldDefinition,
	raw: FieldValue,
	translator: &dyn Translator,
) -> FieldValue {
	let locale_format = definition
		.field_type
		.format_token()
		.map(|token| translator.translate(token, &[]));
	let format = definition.format().or(locale_format.as_deref());
	let text = raw.to_string();
	match validators::parse_temporal(definition.field_type, &text, format) {
		Some(parsed) => parsed,
		None => {
			tracing::trace!(
				field_type = %definition.field_type,
				input = %text,
				"temporal value could not be parsed, keeping raw input"
			);
			raw
		}
	}
}
