//! The message-resolution seam used by form validation.

use crate::error::I18nResult;

/// Resolves message tokens to localized strings.
///
/// Tokens that have no translation resolve to themselves, with placeholders
/// still substituted, so a missing catalog entry degrades to readable output
/// instead of failing the request.
pub trait Translator: Send + Sync {
	/// Translate `token` and substitute `%name%` placeholders from `params`.
	fn translate(&self, token: &str, params: &[(&str, &str)]) -> String;

	/// The currently active locale identifier.
	fn locale(&self) -> String;

	/// Switch the active locale.
	fn set_locale(&self, locale: &str) -> I18nResult<()>;
}

/// Replace every `%name%` placeholder in `template` with its value from `params`.
///
/// Placeholders without a matching parameter are left untouched.
///
/// # Examples
///
/// ```
/// use palisade_i18n::interpolate;
///
/// let text = interpolate("%field% must not exceed %limit%.", &[("field", "Age"), ("limit", "150")]);
/// assert_eq!(text, "Age must not exceed 150.");
///
/// assert_eq!(interpolate("100% %unknown%", &[]), "100% %unknown%");
/// ```
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
	if params.is_empty() || !template.contains('%') {
		return template.to_string();
	}

	let mut out = String::with_capacity(template.len());
	let mut rest = template;
	while let Some(start) = rest.find('%') {
		out.push_str(&rest[..start]);
		let after = &rest[start + 1..];
		let replaced = after.find('%').and_then(|end| {
			let name = &after[..end];
			params
				.iter()
				.find(|(key, _)| *key == name)
				.map(|(_, value)| (*value, end))
		});
		match replaced {
			Some((value, end)) => {
				out.push_str(value);
				rest = &after[end + 1..];
			}
			None => {
				out.push('%');
				rest = after;
			}
		}
	}
	out.push_str(rest);
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("%field% is required.", &[("field", "Name")], "Name is required.")]
	#[case("%a%%b%", &[("a", "x"), ("b", "y")], "xy")]
	#[case("%field% and %field%", &[("field", "A")], "A and A")]
	#[case("50% off", &[("field", "A")], "50% off")]
	#[case("%missing% stays", &[("field", "A")], "%missing% stays")]
	#[case("no placeholders", &[], "no placeholders")]
	fn test_interpolate(
		#[case] template: &str,
		#[case] params: &[(&str, &str)],
		#[case] expected: &str,
	) {
		// Act
		let result = interpolate(template, params);

		// Assert
		assert_eq!(result, expected);
	}

	#[rstest]
	fn test_interpolate_value_containing_percent_is_not_rescanned() {
		// Arrange
		let params = [("field", "%limit%"), ("limit", "3")];

		// Act
		let result = interpolate("%field% / %limit%", &params);

		// Assert
		assert_eq!(result, "%limit% / 3");
	}
}
