//! Annotated fields extracted from a call

use crate::core::error::BindError;
use crate::core::signature::Signature;
use crate::core::types::TypeDescriptor;
use crate::core::value::{CallArgs, Value};

/// A named value paired with its declared type
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
    pub annotation: TypeDescriptor,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<Value>, annotation: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            annotation,
        }
    }
}

/// Bind a call to its signature and keep only annotated parameters
///
/// Fields follow declaration order. Binding failures propagate unchanged.
pub fn extract_fields(signature: &Signature, call: &CallArgs) -> Result<Vec<Field>, BindError> {
    let bound = signature.bind(call)?;
    Ok(bound
        .into_iter()
        .filter_map(|(name, value)| {
            let annotation = signature.parameter(&name)?.bound_annotation()?;
            Some(Field {
                name,
                value,
                annotation,
            })
        })
        .collect())
}
