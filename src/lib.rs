//! # Valdec
//!
//! Validate the arguments and return value of a function against declared
//! type descriptors, using a pluggable validation engine.
//!
//! ## Features
//!
//! - **Declared signatures**: parameters with kinds, annotations and defaults, bound with standard call rules
//! - **Selective validation**: validate everything annotated, an explicit list, or everything but a list
//! - **Pluggable validators**: strict or lax schema validation, or any closure with the validator shape
//! - **Replacement**: validated values (records, coerced scalars) replace the originals before the call
//! - **Sync and async**: the same validation stages wrap plain and future-returning functions
//! - **Configuration-Based**: validator settings can be loaded from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use valdec::prelude::*;
//!
//! fn add(call: CallArgs) -> Result<Value> {
//!     let i = call.args[0].as_int().unwrap_or_default();
//!     Ok(Value::Int(i + 1))
//! }
//!
//! let signature = Signature::builder()
//!     .arg("i", TypeDescriptor::Int)
//!     .returns(TypeDescriptor::Int)
//!     .build()?;
//!
//! let add = validate!(add, signature);
//! assert_eq!(add.call(CallArgs::new().arg(1))?, Value::Int(2));
//! assert!(add.call(CallArgs::new().arg("1")).is_err());
//! ```

pub mod config;
pub mod core;
pub mod decorator;
pub mod validators;

mod macros;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{BindError, SignatureError, ValdecError},
        selection::{DecoratorArg, RETURN_NAME, Selection},
        settings::Settings,
        signature::{ParamKind, Parameter, Signature},
        types::{NativeType, RecordSchema, StringFormat, TypeDescriptor},
        value::{CallArgs, Record, Value},
    };

    // === Decorator ===
    pub use crate::decorator::{Validate, Validated, async_validate, validate};

    // === Macros ===
    pub use crate::validate;

    // === Validators ===
    pub use crate::validators::{
        Annotations, CoercionMode, ExtraOptions, Replacements, SchemaValidator, Validator,
        ValidatorError, Values,
    };

    // === Config ===
    pub use crate::config::{ValidationConfig, ValidatorKind};

    // === External dependencies ===
    pub use anyhow::Result;
}
