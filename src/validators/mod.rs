//! Pluggable validation engines
//!
//! A [`Validator`] receives the selected annotations and values by name and
//! either rejects them or optionally returns replacement values. Engines are
//! interchangeable: [`SchemaValidator`] in strict or lax mode, or any closure
//! with the same shape.

pub mod schema;

pub use schema::{CoercionMode, SchemaValidator};

use crate::core::types::TypeDescriptor;
use crate::core::value::Value;
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;

/// Field name to declared type
pub type Annotations = IndexMap<String, TypeDescriptor>;

/// Field name to call-time value
pub type Values = IndexMap<String, Value>;

/// Field name to the value that should replace it
pub type Replacements = IndexMap<String, Value>;

/// Free-form options forwarded to the validator on every call
pub type ExtraOptions = IndexMap<String, Value>;

/// Validation engine contract
///
/// Implementations must reject any value that does not conform to its paired
/// annotation and name the offending field (with its full path for nested
/// values) in the error. When `replace` is set and at least one normalized
/// value differs from its input, they return those replacements; otherwise
/// they return `None`, never an empty mapping.
pub trait Validator: Send + Sync {
    fn validate(
        &self,
        annotations: &Annotations,
        values: &Values,
        replace: bool,
        extra: &ExtraOptions,
    ) -> Result<Option<Replacements>, ValidatorError>;

    /// Name used in logs
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Validator for F
where
    F: Fn(&Annotations, &Values, bool, &ExtraOptions) -> Result<Option<Replacements>, ValidatorError>
        + Send
        + Sync,
{
    fn validate(
        &self,
        annotations: &Annotations,
        values: &Values,
        replace: bool,
        extra: &ExtraOptions,
    ) -> Result<Option<Replacements>, ValidatorError> {
        self(annotations, values, replace, extra)
    }
}

/// Failure reported by a validator
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// One or more values do not conform to their annotations
    #[error("{0}")]
    Invalid(FieldErrors),

    /// An annotation the engine cannot build a schema from
    #[error("{message}")]
    Schema { message: String },

    /// Any other engine failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ValidatorError {
    pub fn schema(message: impl Into<String>) -> Self {
        ValidatorError::Schema {
            message: message.into(),
        }
    }

    /// Kind name embedded in wrapped error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ValidatorError::Invalid(_) => "ValidationError",
            ValidatorError::Schema { .. } => "SchemaError",
            ValidatorError::Other(_) => "ValidatorError",
        }
    }
}

/// One segment of a path into a nested value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Dotted path from a top-level field down to a nested leaf
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(name.into())])
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.0.push(PathSegment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                PathSegment::Key(key) => write!(f, "{}", key)?,
                PathSegment::Index(index) => write!(f, "{}", index)?,
            }
        }
        Ok(())
    }
}

/// A single failing leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: FieldPath,
    pub message: String,
}

/// Every failing leaf found in one validation run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(pub Vec<FieldIssue>);

impl FieldErrors {
    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.0.len();
        write!(
            f,
            "{} validation error{}",
            count,
            if count == 1 { "" } else { "s" }
        )?;
        for issue in &self.0 {
            write!(f, "\n{}\n  {}", issue.path, issue.message)?;
        }
        Ok(())
    }
}
