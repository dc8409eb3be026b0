//! Typed field values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub(crate) const ISO_DATE: &str = "%Y-%m-%d";
pub(crate) const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";
pub(crate) const ISO_TIME: &str = "%H:%M:%S";

/// The value held by a field.
///
/// Submitted data usually arrives as JSON, so `From<serde_json::Value>` is the
/// main entry point. Temporal variants only appear after write-time coercion
/// of `date`, `datetime` and `time` fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	List(Vec<FieldValue>),
	/// Associative submission shape (`tags[a]=1&tags[b]=1`).
	Map(IndexMap<String, FieldValue>),
	Date(NaiveDate),
	DateTime(NaiveDateTime),
	Time(NaiveTime),
}

impl FieldValue {
	/// `true` for null, `false`, the empty string and empty collections.
	///
	/// `0` is a value, not an absence.
	///
	/// # Examples
	///
	/// ```
	/// use palisade_forms::FieldValue;
	///
	/// assert!(FieldValue::Null.is_empty());
	/// assert!(FieldValue::from("").is_empty());
	/// assert!(FieldValue::from(false).is_empty());
	/// assert!(FieldValue::List(vec![]).is_empty());
	/// assert!(!FieldValue::from(0).is_empty());
	/// assert!(!FieldValue::from("0").is_empty());
	/// ```
	pub fn is_empty(&self) -> bool {
		match self {
			FieldValue::Null => true,
			FieldValue::Bool(b) => !b,
			FieldValue::String(s) => s.is_empty(),
			FieldValue::List(items) => items.is_empty(),
			FieldValue::Map(entries) => entries.is_empty(),
			_ => false,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, FieldValue::Null)
	}

	/// Booleans, numbers and strings.
	pub fn is_scalar(&self) -> bool {
		matches!(
			self,
			FieldValue::Bool(_) | FieldValue::Int(_) | FieldValue::Float(_) | FieldValue::String(_)
		)
	}

	/// Indexed or associative collections.
	pub fn is_list(&self) -> bool {
		matches!(self, FieldValue::List(_) | FieldValue::Map(_))
	}

	pub fn is_temporal(&self) -> bool {
		matches!(
			self,
			FieldValue::Date(_) | FieldValue::DateTime(_) | FieldValue::Time(_)
		)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			FieldValue::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			FieldValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Numeric interpretation of numbers and numeric strings.
	///
	/// # Examples
	///
	/// ```
	/// use palisade_forms::FieldValue;
	///
	/// assert_eq!(FieldValue::from(" 31.5 ").as_number(), Some(31.5));
	/// assert_eq!(FieldValue::from(7).as_number(), Some(7.0));
	/// assert_eq!(FieldValue::from("bar").as_number(), None);
	/// assert_eq!(FieldValue::from("inf").as_number(), None);
	/// ```
	pub fn as_number(&self) -> Option<f64> {
		match self {
			FieldValue::Int(i) => Some(*i as f64),
			FieldValue::Float(f) if f.is_finite() => Some(*f),
			FieldValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
			_ => None,
		}
	}

	/// Number of elements of a list or map.
	pub fn count(&self) -> Option<usize> {
		match self {
			FieldValue::List(items) => Some(items.len()),
			FieldValue::Map(entries) => Some(entries.len()),
			_ => None,
		}
	}

	/// Truthiness of the value's string form: empty and `"0"` are false.
	pub fn truthy(&self) -> bool {
		match self {
			FieldValue::Bool(b) => *b,
			FieldValue::List(items) => !items.is_empty(),
			FieldValue::Map(entries) => !entries.is_empty(),
			other => {
				let text = other.to_string();
				!(text.is_empty() || text == "0")
			}
		}
	}

	/// Equality that tolerates numbers submitted as strings (`"31" == 31`).
	pub fn loosely_equals(&self, other: &FieldValue) -> bool {
		if self == other {
			return true;
		}
		if self.is_list() || other.is_list() {
			return false;
		}
		self.to_string() == other.to_string()
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Null => Ok(()),
			FieldValue::Bool(true) => f.write_str("1"),
			FieldValue::Bool(false) => f.write_str("0"),
			FieldValue::Int(i) => write!(f, "{}", i),
			FieldValue::Float(x) => write!(f, "{}", x),
			FieldValue::String(s) => f.write_str(s),
			FieldValue::List(items) => {
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", item)?;
				}
				Ok(())
			}
			FieldValue::Map(entries) => {
				for (i, item) in entries.values().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", item)?;
				}
				Ok(())
			}
			FieldValue::Date(d) => write!(f, "{}", d.format(ISO_DATE)),
			FieldValue::DateTime(dt) => write!(f, "{}", dt.format(ISO_DATETIME)),
			FieldValue::Time(t) => write!(f, "{}", t.format(ISO_TIME)),
		}
	}
}

impl From<serde_json::Value> for FieldValue {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => FieldValue::Null,
			serde_json::Value::Bool(b) => FieldValue::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => FieldValue::Int(i),
				None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => FieldValue::String(s),
			serde_json::Value::Array(items) => {
				FieldValue::List(items.into_iter().map(FieldValue::from).collect())
			}
			serde_json::Value::Object(entries) => FieldValue::Map(
				entries
					.into_iter()
					.map(|(key, value)| (key, FieldValue::from(value)))
					.collect(),
			),
		}
	}
}

impl From<&FieldValue> for serde_json::Value {
	fn from(value: &FieldValue) -> Self {
		match value {
			FieldValue::Null => serde_json::Value::Null,
			FieldValue::Bool(b) => serde_json::Value::Bool(*b),
			FieldValue::Int(i) => serde_json::Value::from(*i),
			FieldValue::Float(f) => serde_json::Number::from_f64(*f)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			FieldValue::String(s) => serde_json::Value::String(s.clone()),
			FieldValue::List(items) => {
				serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
			}
			FieldValue::Map(entries) => serde_json::Value::Object(
				entries
					.iter()
					.map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
					.collect(),
			),
			temporal => serde_json::Value::String(temporal.to_string()),
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		FieldValue::String(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		FieldValue::String(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		FieldValue::Bool(value)
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		FieldValue::Int(value)
	}
}

impl From<i32> for FieldValue {
	fn from(value: i32) -> Self {
		FieldValue::Int(i64::from(value))
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		FieldValue::Float(value)
	}
}

impl From<NaiveDate> for FieldValue {
	fn from(value: NaiveDate) -> Self {
		FieldValue::Date(value)
	}
}

impl From<NaiveDateTime> for FieldValue {
	fn from(value: NaiveDateTime) -> Self {
		FieldValue::DateTime(value)
	}
}

impl From<NaiveTime> for FieldValue {
	fn from(value: NaiveTime) -> Self {
		FieldValue::Time(value)
	}
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
	fn from(values: Vec<T>) -> Self {
		FieldValue::List(values.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(FieldValue::Null)
	}
}

impl From<IndexMap<String, FieldValue>> for FieldValue {
	fn from(entries: IndexMap<String, FieldValue>) -> Self {
		FieldValue::Map(entries)
	}
}

impl Serialize for FieldValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serde_json::Value::from(self).serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for FieldValue {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(FieldValue::from)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_from_json_object_keeps_submission_order() {
		// Act
		let value = FieldValue::from(json!({"z": 1, "a": 2, "m": 3}));

		// Assert
		let FieldValue::Map(entries) = value else {
			panic!("expected a map, got {:?}", value);
		};
		assert_eq!(entries.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
	}

	#[rstest]
	fn test_from_json_shapes() {
		// Act
		let value = FieldValue::from(json!({"a": [1, 2.5, "x", null, true]}));

		// Assert
		let mut expected = IndexMap::new();
		expected.insert(
			"a".to_string(),
			FieldValue::List(vec![
				FieldValue::Int(1),
				FieldValue::Float(2.5),
				FieldValue::from("x"),
				FieldValue::Null,
				FieldValue::Bool(true),
			]),
		);
		assert_eq!(value, FieldValue::Map(expected));
	}

	#[rstest]
	#[case(FieldValue::Null, "")]
	#[case(FieldValue::Bool(true), "1")]
	#[case(FieldValue::Bool(false), "0")]
	#[case(FieldValue::Float(31.0), "31")]
	#[case(FieldValue::Float(29.9), "29.9")]
	#[case(FieldValue::from(vec!["a", "b"]), "a, b")]
	#[case(FieldValue::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()), "2025-01-15")]
	fn test_display(#[case] value: FieldValue, #[case] expected: &str) {
		// Act & Assert
		assert_eq!(value.to_string(), expected);
	}

	#[rstest]
	#[case(FieldValue::from("31"), FieldValue::from(31), true)]
	#[case(FieldValue::from("31.0"), FieldValue::from(31), false)]
	#[case(FieldValue::from("secret"), FieldValue::from("secret"), true)]
	#[case(FieldValue::Null, FieldValue::from(""), true)]
	#[case(FieldValue::from(vec!["1"]), FieldValue::from("1"), false)]
	fn test_loosely_equals(#[case] a: FieldValue, #[case] b: FieldValue, #[case] expected: bool) {
		// Act & Assert
		assert_eq!(a.loosely_equals(&b), expected);
		assert_eq!(b.loosely_equals(&a), expected);
	}

	#[rstest]
	#[case(FieldValue::from("abc"), true)]
	#[case(FieldValue::from("0"), false)]
	#[case(FieldValue::from(""), false)]
	#[case(FieldValue::from(0), false)]
	#[case(FieldValue::from(2), true)]
	#[case(FieldValue::Null, false)]
	fn test_truthy(#[case] value: FieldValue, #[case] expected: bool) {
		// Act & Assert
		assert_eq!(value.truthy(), expected);
	}

	#[rstest]
	fn test_serialize_temporal_as_iso_string() {
		// Arrange
		let value = FieldValue::DateTime(
			NaiveDate::from_ymd_opt(2025, 3, 1)
				.unwrap()
				.and_hms_opt(8, 30, 0)
				.unwrap(),
		);

		// Act
		let json = serde_json::to_value(&value).unwrap();

		// Assert
		assert_eq!(json, json!("2025-03-01T08:30:00"));
	}

	#[rstest]
	fn test_deserialize_from_json() {
		// Act
		let value: FieldValue = serde_json::from_str(r#"["x", 2]"#).unwrap();

		// Assert
		assert_eq!(
			value,
			FieldValue::List(vec![FieldValue::from("x"), FieldValue::Int(2)])
		);
	}
}
