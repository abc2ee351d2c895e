//! Validation settings shared by every call of a wrapped function

use crate::core::value::Value;
use crate::validators::{ExtraOptions, SchemaValidator, Validator};
use std::fmt;
use std::sync::Arc;

/// Which validator runs and what happens to its replacements
///
/// Fixed at decoration time and shared read-only across calls.
#[derive(Clone)]
pub struct Settings {
    validator: Arc<dyn Validator>,
    replace_args: bool,
    replace_result: bool,
    extra: ExtraOptions,
}

impl Settings {
    pub fn new(validator: impl Validator + 'static) -> Self {
        Self::from_arc(Arc::new(validator))
    }

    pub fn from_arc(validator: Arc<dyn Validator>) -> Self {
        Self {
            validator,
            replace_args: true,
            replace_result: true,
            extra: ExtraOptions::new(),
        }
    }

    /// Substitute arguments with validator-normalized values
    pub fn with_replace_args(mut self, replace: bool) -> Self {
        self.replace_args = replace;
        self
    }

    /// Substitute the return value with its validator-normalized value
    pub fn with_replace_result(mut self, replace: bool) -> Self {
        self.replace_result = replace;
        self
    }

    /// Set one extra option forwarded to the validator
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Replace all extra options
    pub fn with_extra_options(mut self, extra: ExtraOptions) -> Self {
        self.extra = extra;
        self
    }

    pub fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }

    pub fn replace_args(&self) -> bool {
        self.replace_args
    }

    pub fn replace_result(&self) -> bool {
        self.replace_result
    }

    pub fn extra(&self) -> &ExtraOptions {
        &self.extra
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(SchemaValidator::strict())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("validator", &self.validator.name())
            .field("replace_args", &self.replace_args)
            .field("replace_result", &self.replace_result)
            .field("extra", &self.extra)
            .finish()
    }
}
