//! Core module containing the binding, selection and validation pipeline pieces

pub mod error;
pub mod field;
pub mod invoker;
pub mod rewriter;
pub mod selection;
pub mod settings;
pub mod signature;
pub mod types;
pub mod value;

pub use error::{
    ArgumentsValidationError, BindError, ReturnValidationError, SignatureError, ValdecError,
};
pub use field::{Field, extract_fields};
pub use invoker::{ValidationContext, annotations_and_values, run_validation};
pub use rewriter::replace_args_kwargs;
pub use selection::{DecoratorArg, RESULT_KEY, RETURN_NAME, Selection};
pub use settings::Settings;
pub use signature::{BoundArguments, ParamKind, Parameter, Signature, SignatureBuilder};
pub use types::{NativeType, RecordField, RecordSchema, StringFormat, TypeDescriptor};
pub use value::{CallArgs, Record, Value};
