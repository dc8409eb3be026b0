use crate::error::FormError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared type of a field.
///
/// Serialized as its lowercase name, the same string used in form definition
/// files. Parsing an unknown name fails with [`FormError::UnknownType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
	Int,
	Numeric,
	Float,
	Scalar,
	List,
	Bool,
	String,
	Email,
	Ip,
	Url,
	Date,
	DateTime,
	Time,
	Switch,
}

impl FieldType {
	pub const ALL: [FieldType; 14] = [
		FieldType::Int,
		FieldType::Numeric,
		FieldType::Float,
		FieldType::Scalar,
		FieldType::List,
		FieldType::Bool,
		FieldType::String,
		FieldType::Email,
		FieldType::Ip,
		FieldType::Url,
		FieldType::Date,
		FieldType::DateTime,
		FieldType::Time,
		FieldType::Switch,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			FieldType::Int => "int",
			FieldType::Numeric => "numeric",
			FieldType::Float => "float",
			FieldType::Scalar => "scalar",
			FieldType::List => "list",
			FieldType::Bool => "bool",
			FieldType::String => "string",
			FieldType::Email => "email",
			FieldType::Ip => "ip",
			FieldType::Url => "url",
			FieldType::Date => "date",
			FieldType::DateTime => "datetime",
			FieldType::Time => "time",
			FieldType::Switch => "switch",
		}
	}

	/// Types whose bounds compare numerically.
	pub fn is_numeric(&self) -> bool {
		matches!(self, FieldType::Int | FieldType::Numeric | FieldType::Float)
	}

	/// Types whose values are parsed into dates or times on write.
	pub fn is_temporal(&self) -> bool {
		matches!(self, FieldType::Date | FieldType::DateTime | FieldType::Time)
	}

	/// Message token reported when a value does not match this type.
	pub(crate) fn invalid_token(&self) -> &'static str {
		match self {
			FieldType::Int => "form.invalid_int",
			FieldType::Numeric => "form.invalid_numeric",
			FieldType::Float => "form.invalid_float",
			FieldType::Scalar => "form.invalid_scalar",
			FieldType::List => "form.invalid_list",
			FieldType::Bool => "form.invalid_bool",
			FieldType::String => "form.invalid_string",
			FieldType::Email => "form.invalid_email",
			FieldType::Ip => "form.invalid_ip",
			FieldType::Url => "form.invalid_url",
			FieldType::Date => "form.invalid_date",
			FieldType::DateTime => "form.invalid_datetime",
			FieldType::Time => "form.invalid_time",
			FieldType::Switch => "form.invalid_switch",
		}
	}

	/// Locale format token used to parse and display temporal values.
	pub(crate) fn format_token(&self) -> Option<&'static str> {
		match self {
			FieldType::Date => Some("form.date"),
			FieldType::DateTime => Some("form.datetime"),
			FieldType::Time => Some("form.time"),
			_ => None,
		}
	}
}

impl FromStr for FieldType {
	type Err = FormError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		FieldType::ALL
			.iter()
			.copied()
			.find(|ty| ty.as_str() == s)
			.ok_or_else(|| FormError::UnknownType(s.to_string()))
	}
}

impl TryFrom<String> for FieldType {
	type Error = FormError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<FieldType> for String {
	fn from(value: FieldType) -> Self {
		value.as_str().to_string()
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_every_type_round_trips_through_its_name() {
		for ty in FieldType::ALL {
			assert_eq!(ty.as_str().parse::<FieldType>().unwrap(), ty);
		}
	}

	#[rstest]
	#[case("money")]
	#[case("Int")]
	#[case("")]
	fn test_unknown_type_is_rejected(#[case] name: &str) {
		// Act
		let result = name.parse::<FieldType>();

		// Assert
		assert!(matches!(result, Err(FormError::UnknownType(n)) if n == name));
	}

	#[rstest]
	fn test_serde_uses_lowercase_names() {
		// Act
		let json = serde_json::to_string(&FieldType::DateTime).unwrap();
		let parsed: Result<FieldType, _> = serde_json::from_str("\"currency\"");

		// Assert
		assert_eq!(json, "\"datetime\"");
		assert!(parsed.is_err());
	}
}
