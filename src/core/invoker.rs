//! Runs a validator over selected fields and types its failures

use crate::core::error::{ArgumentsValidationError, ReturnValidationError, ValdecError};
use crate::core::field::Field;
use crate::validators::{Annotations, ExtraOptions, Replacements, Validator, Values};
use std::fmt;

/// Whether the validated fields are arguments or the return value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationContext {
    Arguments,
    Result,
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationContext::Arguments => write!(f, "arguments"),
            ValidationContext::Result => write!(f, "result"),
        }
    }
}

/// Split fields into name-to-annotation and name-to-value mappings
pub fn annotations_and_values(fields: &[Field]) -> (Annotations, Values) {
    let mut annotations = Annotations::new();
    let mut values = Values::new();
    for field in fields {
        annotations.insert(field.name.clone(), field.annotation.clone());
        values.insert(field.name.clone(), field.value.clone());
    }
    (annotations, values)
}

/// Validate `fields`, returning replacements if the validator produced any
///
/// Every validator failure becomes an [`ArgumentsValidationError`] or a
/// [`ReturnValidationError`] depending on `context`, keeping the validator's
/// message. An empty replacement mapping is treated as no replacement.
pub fn run_validation(
    fields: &[Field],
    validator: &dyn Validator,
    replace: bool,
    extra: &ExtraOptions,
    context: ValidationContext,
) -> Result<Option<Replacements>, ValdecError> {
    let (annotations, values) = annotations_and_values(fields);

    match validator.validate(&annotations, &values, replace, extra) {
        Ok(replacements) => Ok(replacements.filter(|r| !r.is_empty())),
        Err(error) => {
            let message = format!("Validation error {}: {}.", error.kind(), error);
            tracing::debug!(
                context = %context,
                validator = validator.name(),
                kind = error.kind(),
                "Validation failed"
            );
            Err(match context {
                ValidationContext::Arguments => ArgumentsValidationError::new(message).into(),
                ValidationContext::Result => ReturnValidationError::new(message).into(),
            })
        }
    }
}
