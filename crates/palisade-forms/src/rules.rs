//! The rule evaluator.
//!
//! Each field runs through eight checks in a fixed order:
//! required, min, max, matches, depends, regex, options, type. Errors are
//! returned in that order, which makes "first error" retrieval stable.

use crate::definition::{FieldDefinition, FormDefinition, Limit, OptionsSource};
use crate::error::{FormError, FormResult};
use crate::field_type::FieldType;
use crate::store::ValueStore;
use crate::validators;
use crate::value::{FieldValue, ISO_DATE, ISO_DATETIME, ISO_TIME};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use palisade_i18n::Translator;
use regex::Regex;
use std::cmp::Ordering;

/// Read access to everything a rule may consult.
pub struct RuleContext<'a> {
	pub definition: &'a FormDefinition,
	pub values: &'a ValueStore,
	pub translator: &'a dyn Translator,
	/// Reference point for day-offset date bounds.
	pub now: NaiveDateTime,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Bound {
	Min,
	Max,
}

impl<'a> RuleContext<'a> {
	/// Current value of `name`: the stored value, else the declared default.
	fn current(&self, name: &str) -> FormResult<(&'a FieldDefinition, FieldValue)> {
		let definition = self.definition.field(name)?;
		Ok((definition, self.values.resolve(name, definition)))
	}

	fn caption(&self, name: &str, definition: &FieldDefinition) -> String {
		caption_of(self.translator, name, definition)
	}

	fn message(&self, token: &str, params: &[(&str, &str)]) -> String {
		self.translator.translate(token, params)
	}

	/// Run all rules for `name`.
	pub fn evaluate(&self, name: &str) -> FormResult<Vec<String>> {
		let (definition, value) = self.current(name)?;
		let caption = self.caption(name, definition);
		let mut errors = Vec::new();

		if let Some(error) = self.check_required(definition, &value, &caption) {
			errors.push(error);
		}
		if let Some(error) = self.check_bound(definition, &value, &caption, Bound::Min) {
			errors.push(error);
		}
		if let Some(error) = self.check_bound(definition, &value, &caption, Bound::Max) {
			errors.push(error);
		}
		if let Some(error) = self.check_matches(definition, &value, &caption)? {
			errors.push(error);
		}
		if let Some(error) = self.check_depends(definition, &value, &caption)? {
			errors.push(error);
		}
		if let Some(error) = self.check_regex(name, definition, &value, &caption)? {
			errors.push(error);
		}
		if let Some(error) = self.check_options(name, definition, &value, &caption)? {
			errors.push(error);
		}
		if let Some(error) = self.check_type(definition, &value, &caption) {
			errors.push(error);
		}

		Ok(errors)
	}

	fn check_required(
		&self,
		definition: &FieldDefinition,
		value: &FieldValue,
		caption: &str,
	) -> Option<String> {
		let missing = matches!(value, FieldValue::Null | FieldValue::Bool(false))
			|| value.as_str() == Some("");
		(definition.required && missing)
			.then(|| self.message("form.field_required", &[("field", caption)]))
	}

	fn check_bound(
		&self,
		definition: &FieldDefinition,
		value: &FieldValue,
		caption: &str,
		bound: Bound,
	) -> Option<String> {
		if definition.has_options() || value.is_empty() {
			return None;
		}
		let limit = match bound {
			Bound::Min => definition.min.as_ref()?,
			Bound::Max => definition.max.as_ref()?,
		};
		match definition.field_type {
			FieldType::Int | FieldType::Numeric | FieldType::Float => {
				// Non-numeric input is left to the type rule.
				let number = self.numeric_value(definition, value)?;
				let limit_number = limit.as_number()?;
				let token = violated(number.partial_cmp(&limit_number)?, bound)
					.then_some(match bound {
						Bound::Min => "form.value_too_small",
						Bound::Max => "form.value_too_big",
					})?;
				Some(self.message(token, &[("field", caption), ("limit", &limit.to_string())]))
			}
			FieldType::Date | FieldType::DateTime => self.check_date_bound(definition, value, caption, limit, bound),
			FieldType::Time => {
				let FieldValue::Time(time) = value else {
					return None;
				};
				let Limit::Text(text) = limit else {
					return None;
				};
				let limit_time = validators::parse_time_bound(text)?;
				if !violated(time.cmp(&limit_time), bound) {
					return None;
				}
				let shown = self.format_limit(FieldType::Time, &FieldValue::Time(limit_time));
				Some(self.date_message(bound, caption, &shown))
			}
			FieldType::List => {
				let count = value.count()?;
				let limit_count = limit.as_count()?;
				violated(count.cmp(&limit_count), bound)
					.then(|| self.count_message(bound, caption, limit))
			}
			_ => {
				if value.is_list() {
					return None;
				}
				let length = value.to_string().chars().count();
				let limit_length = limit.as_count()?;
				let token = violated(length.cmp(&limit_length), bound).then_some(match bound {
					Bound::Min => "form.too_short",
					Bound::Max => "form.too_long",
				})?;
				Some(self.message(token, &[("field", caption), ("limit", &limit.to_string())]))
			}
		}
	}

	fn check_date_bound(
		&self,
		definition: &FieldDefinition,
		value: &FieldValue,
		caption: &str,
		limit: &Limit,
		bound: Bound,
	) -> Option<String> {
		let moment = match value {
			FieldValue::Date(date) => date.and_time(NaiveTime::MIN),
			FieldValue::DateTime(datetime) => *datetime,
			_ => return None,
		};
		let limit_moment = match limit {
			Limit::Int(days) => self.now.checked_add_signed(Duration::try_days(*days)?)?,
			Limit::Text(text) => validators::parse_absolute_bound(text)?,
			Limit::Float(_) => return None,
		};
		let ordering = if definition.field_type == FieldType::Date {
			moment.date().cmp(&limit_moment.date())
		} else {
			moment.cmp(&limit_moment)
		};
		if !violated(ordering, bound) {
			return None;
		}
		let shown_value = if definition.field_type == FieldType::Date {
			FieldValue::Date(limit_moment.date())
		} else {
			FieldValue::DateTime(limit_moment)
		};
		let shown = match definition.format() {
			Some(format) => validators::format_temporal(&shown_value, format),
			None => self.format_limit(definition.field_type, &shown_value),
		};
		Some(self.date_message(bound, caption, &shown))
	}

	fn format_limit(&self, field_type: FieldType, value: &FieldValue) -> String {
		let fallback = match field_type {
			FieldType::DateTime => ISO_DATETIME,
			FieldType::Time => ISO_TIME,
			_ => ISO_DATE,
		};
		let format = field_type
			.format_token()
			.map(|token| self.message(token, &[]))
			.filter(|format| !format.starts_with("form."))
			.unwrap_or_else(|| fallback.to_string());
		validators::format_temporal(value, &format)
	}

	fn date_message(&self, bound: Bound, caption: &str, shown: &str) -> String {
		let token = match bound {
			Bound::Min => "form.date_too_early",
			Bound::Max => "form.date_too_late",
		};
		self.message(token, &[("field", caption), ("limit", shown)])
	}

	fn count_message(&self, bound: Bound, caption: &str, limit: &Limit) -> String {
		let token = match bound {
			Bound::Min => "form.too_few_options",
			Bound::Max => "form.too_many_options",
		};
		self.message(token, &[("field", caption), ("limit", &limit.to_string())])
	}

	fn numeric_value(&self, definition: &FieldDefinition, value: &FieldValue) -> Option<f64> {
		match (definition.field_type, value) {
			(FieldType::Float, FieldValue::String(text)) => {
				validators::parse_float(text, &self.decimal_separator(definition))
			}
			_ => value.as_number(),
		}
	}

	fn decimal_separator(&self, definition: &FieldDefinition) -> String {
		match definition.decimal_separator() {
			Some(separator) => separator.to_string(),
			None => {
				let separator = self.message("form.decimal_separator", &[]);
				if separator.chars().count() == 1 {
					separator
				} else {
					".".to_string()
				}
			}
		}
	}

	fn check_matches(
		&self,
		definition: &FieldDefinition,
		value: &FieldValue,
		caption: &str,
	) -> FormResult<Option<String>> {
		let Some((other, negated)) = definition.matches_target() else {
			return Ok(None);
		};
		let (other_definition, other_value) = self.current(other)?;
		let equal = value.loosely_equals(&other_value);
		let token = match (negated, equal) {
			(false, false) => "form.must_match",
			(true, true) => "form.must_not_match",
			_ => return Ok(None),
		};
		let other_caption = self.caption(other, other_definition);
		Ok(Some(self.message(
			token,
			&[("field", caption), ("other_field", &other_caption)],
		)))
	}

	fn check_depends(
		&self,
		definition: &FieldDefinition,
		value: &FieldValue,
		caption: &str,
	) -> FormResult<Option<String>> {
		let Some(dependency) = definition.depends.as_deref() else {
			return Ok(None);
		};
		let (dependency_definition, dependency_value) = self.current(dependency)?;
		if !value.is_empty() {
			return Ok(None);
		}
		let other_caption = self.caption(dependency, dependency_definition);

		if !dependency_value.is_empty() && !definition.depends_value_empty {
			let options = dependency_definition.inline_options();
			let positional = if definition.depends_first_option {
				Some(options.and_then(|options| options.first()))
			} else if definition.depends_last_option {
				Some(options.and_then(|options| options.last()))
			} else {
				None
			};

			let error = match positional {
				// A dependency without options never triggers positional rules.
				Some(None) => None,
				Some(Some((key, label))) => selects(&dependency_value, key).then(|| {
					let label = self.message(label, &[]);
					self.message(
						"form.dependency_option",
						&[
							("field", caption),
							("other_field", &other_caption),
							("option", &label),
						],
					)
				}),
				None => match &definition.depends_value {
					Some(expected) => selects(&dependency_value, &expected.to_string()).then(|| {
						self.message(
							"form.dependency_value",
							&[
								("field", caption),
								("other_field", &other_caption),
								("option", &expected.to_string()),
							],
						)
					}),
					None => Some(self.message(
						"form.dependency_required",
						&[("field", caption), ("other_field", &other_caption)],
					)),
				},
			};
			return Ok(error);
		}

		if dependency_value.is_empty() && definition.depends_value_empty {
			return Ok(Some(self.message(
				"form.dependency_empty",
				&[("field", caption), ("other_field", &other_caption)],
			)));
		}

		Ok(None)
	}

	fn check_regex(
		&self,
		name: &str,
		definition: &FieldDefinition,
		value: &FieldValue,
		caption: &str,
	) -> FormResult<Option<String>> {
		let Some(pattern) = definition.regex.as_deref() else {
			return Ok(None);
		};
		if !value.is_scalar() || value.is_empty() {
			return Ok(None);
		}
		let regex = Regex::new(pattern).map_err(|source| FormError::InvalidRegex {
			field: name.to_string(),
			source,
		})?;
		Ok((!regex.is_match(&value.to_string()))
			.then(|| self.message("form.invalid_format", &[("field", caption)])))
	}

	fn check_options(
		&self,
		name: &str,
		definition: &FieldDefinition,
		value: &FieldValue,
		caption: &str,
	) -> FormResult<Option<String>> {
		let options = match &definition.options {
			None => return Ok(None),
			Some(OptionsSource::Inline(options)) => options,
			Some(OptionsSource::Named(list)) => {
				return Err(FormError::UnknownOptionList {
					field: name.to_string(),
					list: list.clone(),
				});
			}
		};
		if value.is_empty() {
			return Ok(None);
		}

		if definition.min.is_some() || definition.max.is_some() {
			let Some(count) = value.count() else {
				return Ok(Some(
					self.message("form.options_not_list", &[("field", caption)]),
				));
			};
			for (limit, bound) in [(&definition.min, Bound::Min), (&definition.max, Bound::Max)] {
				if let Some(limit) = limit
					&& let Some(limit_count) = limit.as_count()
					&& violated(count.cmp(&limit_count), bound)
				{
					return Ok(Some(self.count_message(bound, caption, limit)));
				}
			}
		}

		Ok(first_invalid_option(value, options).map(|option| {
			self.message(
				"form.invalid_option",
				&[("field", caption), ("option", &option)],
			)
		}))
	}

	fn check_type(
		&self,
		definition: &FieldDefinition,
		value: &FieldValue,
		caption: &str,
	) -> Option<String> {
		if value.is_empty() {
			return None;
		}
		let valid = match definition.field_type {
			FieldType::Int => validators::is_int(value),
			FieldType::Numeric => validators::is_numeric(value),
			FieldType::Float => match value {
				FieldValue::Int(_) => true,
				FieldValue::Float(f) => f.is_finite(),
				FieldValue::String(text) => {
					validators::parse_float(text, &self.decimal_separator(definition)).is_some()
				}
				_ => false,
			},
			FieldType::Scalar => value.is_scalar(),
			FieldType::List => value.is_list(),
			FieldType::Bool => matches!(value, FieldValue::Bool(_)),
			FieldType::String => matches!(
				value,
				FieldValue::String(_) | FieldValue::Int(_) | FieldValue::Float(_)
			),
			FieldType::Email => value.as_str().is_some_and(validators::is_email),
			FieldType::Ip => value.as_str().is_some_and(validators::is_ip),
			FieldType::Url => value.as_str().is_some_and(validators::is_url),
			FieldType::Date => self.is_temporal_of(definition, value, |v| {
				matches!(v, FieldValue::Date(_))
			}),
			FieldType::DateTime => self.is_temporal_of(definition, value, |v| {
				matches!(v, FieldValue::DateTime(_))
			}),
			FieldType::Time => self.is_temporal_of(definition, value, |v| {
				matches!(v, FieldValue::Time(_))
			}),
			FieldType::Switch => matches!(value.to_string().as_str(), "" | "0" | "1"),
		};
		(!valid).then(|| self.message(definition.field_type.invalid_token(), &[("field", caption)]))
	}

	fn is_temporal_of(
		&self,
		definition: &FieldDefinition,
		value: &FieldValue,
		accepts: impl Fn(&FieldValue) -> bool,
	) -> bool {
		if accepts(value) {
			return true;
		}
		let FieldValue::String(text) = value else {
			return false;
		};
		let locale_format = definition
			.field_type
			.format_token()
			.map(|token| self.message(token, &[]));
		let format = definition.format().or(locale_format.as_deref());
		validators::parse_temporal(definition.field_type, text, format).is_some()
	}
}

/// Run all rules for `name` against `ctx`.
pub fn evaluate(ctx: &RuleContext<'_>, name: &str) -> FormResult<Vec<String>> {
	ctx.evaluate(name)
}

/// Translated caption, or the field name when no caption is declared.
pub(crate) fn caption_of(translator: &dyn Translator, name: &str, definition: &FieldDefinition) -> String {
	match &definition.caption {
		Some(caption) => translator.translate(caption, &[]),
		None => name.to_string(),
	}
}

fn violated(ordering: Ordering, bound: Bound) -> bool {
	match bound {
		Bound::Min => ordering == Ordering::Less,
		Bound::Max => ordering == Ordering::Greater,
	}
}

/// Whether `value` equals `key`, or contains it when it is a multi-select.
fn selects(value: &FieldValue, key: &str) -> bool {
	let key = FieldValue::from(key);
	match value {
		FieldValue::List(items) => items.iter().any(|item| item.loosely_equals(&key)),
		FieldValue::Map(entries) => entries.values().any(|item| item.loosely_equals(&key)),
		other => other.loosely_equals(&key),
	}
}

fn first_invalid_option(value: &FieldValue, options: &IndexMap<String, String>) -> Option<String> {
	match value {
		FieldValue::List(items) => items
			.iter()
			.map(FieldValue::to_string)
			.find(|item| !options.contains_key(item)),
		FieldValue::Map(entries) => entries
			.iter()
			.find(|(key, item)| {
				!options.contains_key(key.as_str()) && !options.contains_key(&item.to_string())
			})
			.map(|(_, item)| item.to_string()),
		other => {
			let key = other.to_string();
			(!options.contains_key(&key)).then_some(key)
		}
	}
}
