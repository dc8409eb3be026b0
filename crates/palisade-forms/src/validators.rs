//! Format checks used by write-time coercion and the `type` rule.

use crate::field_type::FieldType;
use crate::value::{FieldValue, ISO_DATE, ISO_DATETIME, ISO_TIME};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::fmt::Write;
use std::net::IpAddr;
use std::sync::LazyLock;

// HTTP/HTTPS URL pattern.
//
// - http or https scheme only
// - domain labels without leading/trailing hyphens
// - optional port, path, query string and fragment
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^https?://[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]*[a-zA-Z0-9])?)*(:[0-9]{1,5})?(/[^\s?#]*)?(\?[^\s#]*)?(#[^\s]*)?$",
	)
	.expect("URL_REGEX: invalid regex pattern")
});

// Local part of dot-atoms, then a domain with at least one dot and an
// alphabetic TLD.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

static INT_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("INT_REGEX: invalid regex pattern"));

// Plain decimal notation with optional exponent; rejects `inf`, `NaN` and hex.
static NUMERIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
		.expect("NUMERIC_REGEX: invalid regex pattern")
});

/// Validates an email address.
///
/// # Examples
///
/// ```
/// use palisade_forms::validators::is_email;
///
/// assert!(is_email("xyz@ibm.com"));
/// assert!(!is_email("xyz"));
/// assert!(!is_email("a@b"));
/// ```
pub fn is_email(value: &str) -> bool {
	value.len() <= 254 && EMAIL_REGEX.is_match(value)
}

/// Validates an HTTP or HTTPS URL.
///
/// # Examples
///
/// ```
/// use palisade_forms::validators::is_url;
///
/// assert!(is_url("https://example.com/path?q=1"));
/// assert!(is_url("http://localhost:8080"));
/// assert!(!is_url("ftp://example.com"));
/// ```
pub fn is_url(value: &str) -> bool {
	URL_REGEX.is_match(value)
}

/// Validates an IPv4 or IPv6 address.
pub fn is_ip(value: &str) -> bool {
	value.parse::<IpAddr>().is_ok()
}

/// Integer pattern: integers, integral floats, and strings of digits with an
/// optional sign.
pub fn is_int(value: &FieldValue) -> bool {
	match value {
		FieldValue::Int(_) => true,
		FieldValue::Float(f) => f.is_finite() && f.fract() == 0.0,
		FieldValue::String(s) => INT_REGEX.is_match(s.trim()),
		_ => false,
	}
}

/// Numbers and decimal strings using `.` as separator.
pub fn is_numeric(value: &FieldValue) -> bool {
	match value {
		FieldValue::Int(_) => true,
		FieldValue::Float(f) => f.is_finite(),
		FieldValue::String(s) => NUMERIC_REGEX.is_match(s.trim()),
		_ => false,
	}
}

/// Parse a decimal number written with the given separator.
///
/// With a separator other than `.`, a `.` in the input is rejected so that
/// `1.5` typed into a German form is not silently read as fifteen tenths.
///
/// # Examples
///
/// ```
/// use palisade_forms::validators::parse_float;
///
/// assert_eq!(parse_float("3,25", ","), Some(3.25));
/// assert_eq!(parse_float("3.25", ","), None);
/// assert_eq!(parse_float("3.25", "."), Some(3.25));
/// ```
pub fn parse_float(text: &str, separator: &str) -> Option<f64> {
	let text = text.trim();
	let normalized = if separator == "." || separator.is_empty() {
		text.to_string()
	} else {
		if text.contains('.') {
			return None;
		}
		text.replace(separator, ".")
	};
	if !NUMERIC_REGEX.is_match(&normalized) {
		return None;
	}
	normalized.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parse text into the temporal value for `field_type`, trying `format`
/// first and the ISO forms after it.
pub fn parse_temporal(field_type: FieldType, text: &str, format: Option<&str>) -> Option<FieldValue> {
	let text = text.trim();
	match field_type {
		FieldType::Date => format
			.into_iter()
			.chain([ISO_DATE])
			.find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
			.map(FieldValue::Date),
		FieldType::DateTime => format
			.into_iter()
			.chain([ISO_DATETIME, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"])
			.find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
			.map(FieldValue::DateTime),
		FieldType::Time => format
			.into_iter()
			.chain([ISO_TIME, "%H:%M"])
			.find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
			.map(FieldValue::Time),
		_ => None,
	}
}

/// Absolute date bound: an ISO date (midnight) or an ISO datetime.
pub fn parse_absolute_bound(text: &str) -> Option<NaiveDateTime> {
	match parse_temporal(FieldType::DateTime, text, None) {
		Some(FieldValue::DateTime(dt)) => Some(dt),
		_ => match parse_temporal(FieldType::Date, text, None) {
			Some(FieldValue::Date(d)) => Some(d.and_time(NaiveTime::MIN)),
			_ => None,
		},
	}
}

/// Time bound: `HH:MM:SS` or `HH:MM`.
pub fn parse_time_bound(text: &str) -> Option<NaiveTime> {
	match parse_temporal(FieldType::Time, text, None) {
		Some(FieldValue::Time(t)) => Some(t),
		_ => None,
	}
}

/// Render a temporal value with a `chrono` format, falling back to the ISO
/// form when the format cannot render it.
pub(crate) fn format_temporal(value: &FieldValue, format: &str) -> String {
	let mut out = String::new();
	let rendered = match value {
		FieldValue::Date(d) => write!(out, "{}", d.format(format)),
		FieldValue::DateTime(dt) => write!(out, "{}", dt.format(format)),
		FieldValue::Time(t) => write!(out, "{}", t.format(format)),
		other => return other.to_string(),
	};
	match rendered {
		Ok(()) => out,
		Err(_) => value.to_string(),
	}
}
