//! Typed error handling for validated calls
//!
//! # Error Categories
//!
//! - [`BindError`]: the supplied arguments do not fit the declared parameters.
//!   Surfaces as-is, it is never turned into a validation error.
//! - [`ArgumentsValidationError`]: a selected argument failed validation; the
//!   wrapped function was not called.
//! - [`ReturnValidationError`]: the return value failed validation; the wrapped
//!   function already ran.
//! - [`SignatureError`]: a signature descriptor is malformed (decoration time).
//!
//! # Example
//!
//! ```rust,ignore
//! match validated.call(CallArgs::new().arg("1").arg("x")) {
//!     Ok(value) => println!("{}", value),
//!     Err(ValdecError::Arguments(e)) => eprintln!("bad input: {}", e),
//!     Err(ValdecError::Binding(e)) => eprintln!("bad call: {}", e),
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type returned by validated calls
#[derive(Debug, Error)]
pub enum ValdecError {
    /// Call arguments could not be bound to the signature
    #[error(transparent)]
    Binding(#[from] BindError),

    /// An argument failed validation
    #[error(transparent)]
    Arguments(#[from] ArgumentsValidationError),

    /// The return value failed validation
    #[error(transparent)]
    Return(#[from] ReturnValidationError),

    /// Malformed signature descriptor
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The wrapped function itself returned an error
    #[error("wrapped call failed: {0}")]
    Invocation(anyhow::Error),
}

impl ValdecError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ValdecError::Binding(_) => "BINDING_ERROR",
            ValdecError::Arguments(_) => "ARGUMENTS_VALIDATION_ERROR",
            ValdecError::Return(_) => "RETURN_VALIDATION_ERROR",
            ValdecError::Signature(_) => "SIGNATURE_ERROR",
            ValdecError::Invocation(_) => "INVOCATION_ERROR",
        }
    }

    /// True for argument and return validation failures
    pub fn is_validation(&self) -> bool {
        matches!(self, ValdecError::Arguments(_) | ValdecError::Return(_))
    }
}

/// Raised when a selected argument does not conform to its annotation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ArgumentsValidationError {
    message: String,
}

impl ArgumentsValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Raised when the return value does not conform to the return annotation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ReturnValidationError {
    message: String,
}

impl ReturnValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Supplied arguments cannot bind to the declared parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("missing a required argument: '{name}'")]
    MissingArgument { name: String },

    #[error("too many positional arguments: expected at most {expected}, got {given}")]
    TooManyPositional { expected: usize, given: usize },

    #[error("got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { name: String },

    #[error("multiple values for argument '{name}'")]
    MultipleValues { name: String },

    #[error("'{name}' parameter is positional only, but was passed as a keyword")]
    PositionalOnlyAsKeyword { name: String },
}

/// A signature descriptor violates parameter ordering rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("duplicate parameter name '{name}'")]
    DuplicateParameter { name: String },

    #[error("'{name}' is reserved and cannot name a parameter")]
    ReservedName { name: String },

    #[error("more than one {kind} parameter ('{name}')")]
    DuplicateVariadic { kind: &'static str, name: String },

    #[error("parameter '{name}' follows the variadic keyword parameter")]
    ParameterAfterVarKeyword { name: String },

    #[error("positional parameter '{name}' follows the variadic positional parameter")]
    PositionalAfterVarPositional { name: String },

    #[error("positional-only parameter '{name}' follows a positional-or-keyword parameter")]
    PositionalOnlyAfterPositionalOrKeyword { name: String },

    #[error("required parameter '{name}' follows a parameter with a default")]
    RequiredAfterDefault { name: String },
}
