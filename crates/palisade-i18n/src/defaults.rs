//! Built-in catalogs for the `form.*` tokens.
//!
//! Format tokens (`form.date`, `form.datetime`, `form.time`) hold `chrono`
//! format strings; `form.decimal_separator` holds a single character.

use crate::catalog::MessageCatalog;

const ENGLISH: &[(&str, &str)] = &[
	("form.date", "%Y-%m-%d"),
	("form.datetime", "%Y-%m-%d %H:%M"),
	("form.time", "%H:%M"),
	("form.decimal_separator", "."),
	("form.field_required", "%field% is required."),
	("form.value_too_small", "%field% must be at least %limit%."),
	("form.value_too_big", "%field% must not be greater than %limit%."),
	("form.date_too_early", "%field% must not be before %limit%."),
	("form.date_too_late", "%field% must not be after %limit%."),
	(
		"form.too_few_options",
		"Please select at least %limit% options for %field%.",
	),
	(
		"form.too_many_options",
		"Please select no more than %limit% options for %field%.",
	),
	(
		"form.too_short",
		"%field% must be at least %limit% characters long.",
	),
	(
		"form.too_long",
		"%field% must not be longer than %limit% characters.",
	),
	("form.must_match", "%field% must match %other_field%."),
	(
		"form.must_not_match",
		"%field% must be different from %other_field%.",
	),
	(
		"form.dependency_required",
		"%field% is required when %other_field% is filled in.",
	),
	(
		"form.dependency_option",
		"%field% is required when %other_field% is set to %option%.",
	),
	(
		"form.dependency_value",
		"%field% is required when %other_field% is %option%.",
	),
	(
		"form.dependency_empty",
		"%field% is required because %other_field% is empty.",
	),
	("form.invalid_format", "%field% has an invalid format."),
	("form.options_not_list", "%field% expects a selection of options."),
	("form.invalid_option", "%option% is not a valid choice for %field%."),
	("form.invalid_int", "%field% must be a whole number."),
	("form.invalid_numeric", "%field% must be a number."),
	("form.invalid_float", "%field% must be a decimal number."),
	("form.invalid_scalar", "%field% must be a single value."),
	("form.invalid_list", "%field% must be a list of values."),
	("form.invalid_bool", "%field% must be yes or no."),
	("form.invalid_string", "%field% must be text."),
	("form.invalid_email", "%field% must be a valid email address."),
	("form.invalid_ip", "%field% must be a valid IP address."),
	("form.invalid_url", "%field% must be a valid URL."),
	("form.invalid_date", "%field% must be a valid date."),
	("form.invalid_datetime", "%field% must be a valid date and time."),
	("form.invalid_time", "%field% must be a valid time."),
	("form.invalid_switch", "%field% must be either on or off."),
];

const GERMAN: &[(&str, &str)] = &[
	("form.date", "%d.%m.%Y"),
	("form.datetime", "%d.%m.%Y %H:%M"),
	("form.time", "%H:%M"),
	("form.decimal_separator", ","),
	("form.field_required", "%field% ist ein Pflichtfeld."),
	("form.value_too_small", "%field% muss mindestens %limit% sein."),
	("form.value_too_big", "%field% darf höchstens %limit% sein."),
	("form.date_too_early", "%field% darf nicht vor dem %limit% liegen."),
	("form.date_too_late", "%field% darf nicht nach dem %limit% liegen."),
	(
		"form.too_few_options",
		"Bitte wählen Sie mindestens %limit% Optionen für %field%.",
	),
	(
		"form.too_many_options",
		"Bitte wählen Sie höchstens %limit% Optionen für %field%.",
	),
	(
		"form.too_short",
		"%field% muss mindestens %limit% Zeichen lang sein.",
	),
	(
		"form.too_long",
		"%field% darf höchstens %limit% Zeichen lang sein.",
	),
	(
		"form.must_match",
		"%field% muss mit %other_field% übereinstimmen.",
	),
	(
		"form.must_not_match",
		"%field% muss sich von %other_field% unterscheiden.",
	),
	(
		"form.dependency_required",
		"%field% ist erforderlich, wenn %other_field% ausgefüllt ist.",
	),
	(
		"form.dependency_option",
		"%field% ist erforderlich, wenn für %other_field% %option% gewählt ist.",
	),
	(
		"form.dependency_value",
		"%field% ist erforderlich, wenn %other_field% den Wert %option% hat.",
	),
	(
		"form.dependency_empty",
		"%field% ist erforderlich, da %other_field% leer ist.",
	),
	("form.invalid_format", "%field% hat ein ungültiges Format."),
	(
		"form.options_not_list",
		"%field% erwartet eine Auswahl von Optionen.",
	),
	(
		"form.invalid_option",
		"%option% ist keine gültige Auswahl für %field%.",
	),
	("form.invalid_int", "%field% muss eine ganze Zahl sein."),
	("form.invalid_numeric", "%field% muss eine Zahl sein."),
	("form.invalid_float", "%field% muss eine Dezimalzahl sein."),
	("form.invalid_scalar", "%field% muss ein einzelner Wert sein."),
	("form.invalid_list", "%field% muss eine Liste von Werten sein."),
	("form.invalid_bool", "%field% muss ja oder nein sein."),
	("form.invalid_string", "%field% muss ein Text sein."),
	(
		"form.invalid_email",
		"%field% muss eine gültige E-Mail-Adresse sein.",
	),
	("form.invalid_ip", "%field% muss eine gültige IP-Adresse sein."),
	("form.invalid_url", "%field% muss eine gültige URL sein."),
	("form.invalid_date", "%field% muss ein gültiges Datum sein."),
	(
		"form.invalid_datetime",
		"%field% muss ein gültiges Datum mit Uhrzeit sein.",
	),
	("form.invalid_time", "%field% muss eine gültige Uhrzeit sein."),
	("form.invalid_switch", "%field% muss an oder aus sein."),
];

fn build(locale: &str, entries: &[(&str, &str)]) -> MessageCatalog {
	let mut catalog = MessageCatalog::new(locale);
	for (token, text) in entries {
		catalog.add(*token, *text);
	}
	catalog
}

/// The built-in English catalog.
pub fn english() -> MessageCatalog {
	build("en", ENGLISH)
}

/// The built-in German catalog.
pub fn german() -> MessageCatalog {
	build("de", GERMAN)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_catalogs_cover_the_same_tokens() {
		// Arrange
		let en: Vec<&str> = ENGLISH.iter().map(|(token, _)| *token).collect();
		let de: Vec<&str> = GERMAN.iter().map(|(token, _)| *token).collect();

		// Assert
		assert_eq!(en, de);
		assert_eq!(english().len(), ENGLISH.len());
	}

	#[rstest]
	#[case("form.invalid_int")]
	#[case("form.invalid_numeric")]
	#[case("form.invalid_float")]
	#[case("form.invalid_scalar")]
	#[case("form.invalid_list")]
	#[case("form.invalid_bool")]
	#[case("form.invalid_string")]
	#[case("form.invalid_email")]
	#[case("form.invalid_ip")]
	#[case("form.invalid_url")]
	#[case("form.invalid_date")]
	#[case("form.invalid_datetime")]
	#[case("form.invalid_time")]
	#[case("form.invalid_switch")]
	fn test_type_tokens_present(#[case] token: &str) {
		// Act & Assert
		assert!(english().get(token).is_some());
		assert!(german().get(token).is_some());
	}
}
