//! Wrapping functions with argument and return validation
//!
//! A wrapped function receives its arguments as [`CallArgs`] and returns a
//! [`Value`]. Wrapping is described by a [`Validate`] decoration, applied
//! either bare (validate everything annotated) or with an explicit name list.
//!
//! # Usage
//!
//! ```rust,ignore
//! let signature = Signature::builder()
//!     .arg("i", TypeDescriptor::Int)
//!     .arg("s", TypeDescriptor::Str)
//!     .returns(TypeDescriptor::Int)
//!     .build()?;
//!
//! // Bare: every annotated parameter and the return value
//! let f = validate!(|call: CallArgs| Ok(call.args[0].clone()), signature.clone());
//!
//! // Only "i" and the return value
//! let g = validate!("i", "return").wrap(signature, |call: CallArgs| Ok(call.args[0].clone()));
//!
//! assert_eq!(f.call(CallArgs::new().arg(1).arg("x"))?, Value::Int(1));
//! ```

pub mod pipeline;

pub use pipeline::Pipeline;

use crate::core::error::ValdecError;
use crate::core::selection::{DecoratorArg, Selection};
use crate::core::settings::Settings;
use crate::core::signature::Signature;
use crate::core::value::{CallArgs, Value};
use std::future::Future;
use std::sync::Arc;

/// Decoration-time description of what to validate and how
#[derive(Debug, Clone, Default)]
pub struct Validate {
    selection: Selection,
    settings: Settings,
}

impl Validate {
    /// Bare decoration: every annotated parameter and the return value
    pub fn all() -> Self {
        Self::default()
    }

    /// Validate only the named fields (`"return"` names the return value)
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selection: Selection::only(names),
            settings: Settings::default(),
        }
    }

    /// Build from raw decorator arguments, bare when the first is a callable
    pub fn from_decorator_args(args: &[DecoratorArg]) -> Self {
        Self {
            selection: Selection::from_decorator_args(args, false),
            settings: Settings::default(),
        }
    }

    /// Treat the names as exclusions instead of inclusions
    pub fn exclude(mut self, exclude: bool) -> Self {
        self.selection = self.selection.with_exclude(exclude);
        self
    }

    /// Override the default settings
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Wrap a synchronous function
    pub fn wrap<F>(self, signature: Signature, func: F) -> Validated<Direct<F>>
    where
        F: Fn(CallArgs) -> anyhow::Result<Value>,
    {
        Validated::new(self.pipeline(signature), Direct(func))
    }

    /// Wrap a function whose call suspends until its result is ready
    pub fn wrap_async<F, Fut>(self, signature: Signature, func: F) -> Validated<Awaited<F>>
    where
        F: Fn(CallArgs) -> Fut,
        Fut: Future<Output = anyhow::Result<Value>>,
    {
        Validated::new(self.pipeline(signature), Awaited(func))
    }

    fn pipeline(self, signature: Signature) -> Pipeline {
        Pipeline::new(signature, self.selection, self.settings)
    }
}

/// Bare decoration of a synchronous function
pub fn validate<F>(signature: Signature, func: F) -> Validated<Direct<F>>
where
    F: Fn(CallArgs) -> anyhow::Result<Value>,
{
    Validate::all().wrap(signature, func)
}

/// Bare decoration of an asynchronous function
pub fn async_validate<F, Fut>(signature: Signature, func: F) -> Validated<Awaited<F>>
where
    F: Fn(CallArgs) -> Fut,
    Fut: Future<Output = anyhow::Result<Value>>,
{
    Validate::all().wrap_async(signature, func)
}

/// Invoke the wrapped function directly
#[derive(Debug)]
pub struct Direct<F>(F);

/// Invoke the wrapped function and await its future
#[derive(Debug)]
pub struct Awaited<F>(F);

/// A function wrapped with validation stages
///
/// `S` is the invocation strategy ([`Direct`] or [`Awaited`]); the stages
/// before and after the call are the same for both. Cloning is cheap and
/// clones share the same pipeline and function.
#[derive(Debug)]
pub struct Validated<S> {
    pipeline: Arc<Pipeline>,
    strategy: Arc<S>,
}

impl<S> Clone for Validated<S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            strategy: Arc::clone(&self.strategy),
        }
    }
}

impl<S> Validated<S> {
    fn new(pipeline: Pipeline, strategy: S) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            strategy: Arc::new(strategy),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn signature(&self) -> &Signature {
        self.pipeline.signature()
    }
}

impl<F> Validated<Direct<F>>
where
    F: Fn(CallArgs) -> anyhow::Result<Value>,
{
    /// Validate arguments, call the function, validate its result
    pub fn call(&self, call: CallArgs) -> Result<Value, ValdecError> {
        let call = self.pipeline.before(call)?;
        let result = (self.strategy.0)(call).map_err(ValdecError::Invocation)?;
        self.pipeline.after(result)
    }
}

impl<F, Fut> Validated<Awaited<F>>
where
    F: Fn(CallArgs) -> Fut,
    Fut: Future<Output = anyhow::Result<Value>>,
{
    /// Validate arguments, await the function, validate its result
    ///
    /// The only suspension point is the wrapped call itself.
    pub async fn call(&self, call: CallArgs) -> Result<Value, ValdecError> {
        let call = self.pipeline.before(call)?;
        let result = (self.strategy.0)(call)
            .await
            .map_err(ValdecError::Invocation)?;
        self.pipeline.after(result)
    }
}
