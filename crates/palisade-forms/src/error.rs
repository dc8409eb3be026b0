//! Fatal errors raised by form operations.
//!
//! Field validation failures caused by submitted data are never represented
//! here; they are collected per field and read through `Form::errors`.

use palisade_i18n::I18nError;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Field '{0}' is not defined")]
	UnknownField(String),
	#[error("Field '{0}' is already defined")]
	DuplicateField(String),
	#[error("No value supplied for defined field '{0}'")]
	MissingValue(String),
	#[error("Unknown field type '{0}'")]
	UnknownType(String),
	#[error("Invalid type_params for field '{field}': {reason}")]
	InvalidTypeParams { field: String, reason: String },
	#[error("Invalid {which} bound for field '{field}': {reason}")]
	InvalidBound {
		field: String,
		which: &'static str,
		reason: String,
	},
	#[error("Invalid regex for field '{field}': {source}")]
	InvalidRegex {
		field: String,
		#[source]
		source: regex::Error,
	},
	#[error("Option list '{list}' for field '{field}' could not be resolved")]
	UnknownOptionList { field: String, list: String },
	#[error("Field '{0}' sets both depends_first_option and depends_last_option")]
	ConflictingDependency(String),
	#[error("Field '{field}' is still referenced by '{by}'")]
	ReferencedField { field: String, by: String },
	#[error("Field name '{0}' is purely numeric")]
	NumericFieldName(String),
	#[error("Form has already been validated; call clear_errors() first")]
	AlreadyValidated,
	#[error("Form has not been validated yet")]
	NotValidated,
	#[error(transparent)]
	I18n(#[from] I18nError),
}

impl FormError {
	/// Errors caused by calling session operations in the wrong state.
	pub fn is_session_error(&self) -> bool {
		matches!(self, FormError::AlreadyValidated | FormError::NotValidated)
	}

	/// Errors caused by a faulty field definition or a reference to an
	/// undefined field.
	pub fn is_definition_error(&self) -> bool {
		!self.is_session_error() && !matches!(self, FormError::I18n(_))
	}
}

pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_error_display() {
		// Arrange
		let err = FormError::UnknownField("nickname".to_string());

		// Act & Assert
		assert_eq!(err.to_string(), "Field 'nickname' is not defined");
	}

	#[rstest]
	#[case(FormError::AlreadyValidated, true, false)]
	#[case(FormError::NotValidated, true, false)]
	#[case(FormError::DuplicateField("a".to_string()), false, true)]
	#[case(FormError::UnknownType("money".to_string()), false, true)]
	#[case(FormError::I18n(I18nError::UnknownLocale("xx".to_string())), false, false)]
	fn test_error_classification(
		#[case] err: FormError,
		#[case] session: bool,
		#[case] definition: bool,
	) {
		// Act & Assert
		assert_eq!(err.is_session_error(), session);
		assert_eq!(err.is_definition_error(), definition);
	}
}
