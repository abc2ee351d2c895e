//! Parameter descriptors and call binding
//!
//! A [`Signature`] is built once when a function is wrapped and describes
//! every parameter: its name, how it may be supplied, its annotation and its
//! default. Binding a [`CallArgs`] against it follows the usual rules for
//! positional, keyword and variadic parameters.

use crate::core::error::{BindError, SignatureError};
use crate::core::selection::RETURN_NAME;
use crate::core::types::TypeDescriptor;
use crate::core::value::{CallArgs, Value};
use indexmap::IndexMap;
use std::collections::HashSet;

/// How a parameter may be supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    /// Collects surplus positional arguments
    VarPositional,
    KeywordOnly,
    /// Collects surplus keyword arguments
    VarKeyword,
}

impl ParamKind {
    /// Whether the parameter occupies a positional slot
    pub fn is_positional(&self) -> bool {
        matches!(self, ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword)
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    /// Declared type; unannotated parameters are never validated
    pub annotation: Option<TypeDescriptor>,
    pub default: Option<Value>,
}

impl Parameter {
    fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotation: None,
            default: None,
        }
    }

    pub fn positional_only(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::PositionalOnly)
    }

    pub fn positional_or_keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::PositionalOrKeyword)
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::KeywordOnly)
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::VarPositional)
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::VarKeyword)
    }

    /// Attach an annotation
    ///
    /// For variadic parameters the annotation describes each collected element.
    pub fn typed(mut self, annotation: TypeDescriptor) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.kind.is_variadic()
    }

    /// Annotation of the bound value: variadics bind a list or a mapping
    pub fn bound_annotation(&self) -> Option<TypeDescriptor> {
        let annotation = self.annotation.clone()?;
        Some(match self.kind {
            ParamKind::VarPositional => TypeDescriptor::list(annotation),
            ParamKind::VarKeyword => TypeDescriptor::map(annotation),
            _ => annotation,
        })
    }
}

/// Declared parameters and return annotation of a wrapped function
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
    return_annotation: Option<TypeDescriptor>,
}

impl Signature {
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::default()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Positional slot of a named parameter, if it has one
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.parameters
            .iter()
            .filter(|p| p.kind.is_positional())
            .position(|p| p.name == name)
    }

    /// Number of named positional slots
    pub fn positional_count(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| p.kind.is_positional())
            .count()
    }

    pub fn var_positional(&self) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.kind == ParamKind::VarPositional)
    }

    pub fn var_keyword(&self) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.kind == ParamKind::VarKeyword)
    }

    pub fn return_annotation(&self) -> Option<&TypeDescriptor> {
        self.return_annotation.as_ref()
    }

    /// Return annotation, or the `None` type when none is declared
    pub fn effective_return(&self) -> TypeDescriptor {
        self.return_annotation
            .clone()
            .unwrap_or(TypeDescriptor::None)
    }

    /// Bind supplied arguments to parameter names
    ///
    /// Only supplied parameters are bound; defaults are not applied and empty
    /// variadics are left out. The result follows declaration order.
    pub fn bind(&self, call: &CallArgs) -> Result<BoundArguments, BindError> {
        let positional: Vec<&Parameter> = self
            .parameters
            .iter()
            .filter(|p| p.kind.is_positional())
            .collect();
        let var_positional = self.var_positional();
        let var_keyword = self.var_keyword();

        let mut named: IndexMap<&str, Value> = IndexMap::new();
        let mut extra_args = Vec::new();
        let mut extra_kwargs = IndexMap::new();

        for (index, value) in call.args.iter().enumerate() {
            match positional.get(index) {
                Some(param) => {
                    named.insert(param.name.as_str(), value.clone());
                }
                None if var_positional.is_some() => extra_args.push(value.clone()),
                None => {
                    return Err(BindError::TooManyPositional {
                        expected: positional.len(),
                        given: call.args.len(),
                    });
                }
            }
        }

        for (name, value) in &call.kwargs {
            let target = self
                .parameter(name)
                .filter(|p| !p.kind.is_variadic());
            match target {
                Some(param) if param.kind == ParamKind::PositionalOnly => {
                    if var_keyword.is_some() {
                        extra_kwargs.insert(name.clone(), value.clone());
                    } else {
                        return Err(BindError::PositionalOnlyAsKeyword { name: name.clone() });
                    }
                }
                Some(param) => {
                    if named.contains_key(param.name.as_str()) {
                        return Err(BindError::MultipleValues { name: name.clone() });
                    }
                    named.insert(param.name.as_str(), value.clone());
                }
                None if var_keyword.is_some() => {
                    extra_kwargs.insert(name.clone(), value.clone());
                }
                None => return Err(BindError::UnexpectedKeyword { name: name.clone() }),
            }
        }

        if let Some(missing) = self
            .parameters
            .iter()
            .find(|p| p.is_required() && !named.contains_key(p.name.as_str()))
        {
            return Err(BindError::MissingArgument {
                name: missing.name.clone(),
            });
        }

        let mut arguments = IndexMap::new();
        for param in &self.parameters {
            match param.kind {
                ParamKind::VarPositional if !extra_args.is_empty() => {
                    arguments.insert(param.name.clone(), Value::List(std::mem::take(&mut extra_args)));
                }
                ParamKind::VarKeyword if !extra_kwargs.is_empty() => {
                    arguments.insert(param.name.clone(), Value::Map(std::mem::take(&mut extra_kwargs)));
                }
                ParamKind::VarPositional | ParamKind::VarKeyword => {}
                _ => {
                    if let Some(value) = named.shift_remove(param.name.as_str()) {
                        arguments.insert(param.name.clone(), value);
                    }
                }
            }
        }

        Ok(BoundArguments { arguments })
    }
}

/// Builder for [`Signature`]
#[derive(Debug, Default)]
pub struct SignatureBuilder {
    parameters: Vec<Parameter>,
    return_annotation: Option<TypeDescriptor>,
}

impl SignatureBuilder {
    /// Add a parameter
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Add an annotated positional-or-keyword parameter
    pub fn arg(self, name: impl Into<String>, annotation: TypeDescriptor) -> Self {
        self.param(Parameter::positional_or_keyword(name).typed(annotation))
    }

    /// Add an unannotated positional-or-keyword parameter
    pub fn untyped(self, name: impl Into<String>) -> Self {
        self.param(Parameter::positional_or_keyword(name))
    }

    /// Declare the return annotation
    pub fn returns(mut self, annotation: TypeDescriptor) -> Self {
        self.return_annotation = Some(annotation);
        self
    }

    pub fn build(self) -> Result<Signature, SignatureError> {
        let mut seen = HashSet::new();
        let mut after_var_positional = false;
        let mut after_var_keyword = false;
        let mut after_default = false;
        let mut after_positional_or_keyword = false;

        for param in &self.parameters {
            let name = param.name.clone();
            if name == RETURN_NAME {
                return Err(SignatureError::ReservedName { name });
            }
            if !seen.insert(param.name.as_str()) {
                return Err(SignatureError::DuplicateParameter { name });
            }
            if after_var_keyword {
                return Err(SignatureError::ParameterAfterVarKeyword { name });
            }
            match param.kind {
                ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword => {
                    if after_var_positional {
                        return Err(SignatureError::PositionalAfterVarPositional { name });
                    }
                    if param.kind == ParamKind::PositionalOrKeyword {
                        after_positional_or_keyword = true;
                    } else if after_positional_or_keyword {
                        return Err(SignatureError::PositionalOnlyAfterPositionalOrKeyword { name });
                    }
                    if param.default.is_some() {
                        after_default = true;
                    } else if after_default {
                        return Err(SignatureError::RequiredAfterDefault { name });
                    }
                }
                ParamKind::VarPositional => {
                    if after_var_positional {
                        return Err(SignatureError::DuplicateVariadic {
                            kind: "variadic positional",
                            name,
                        });
                    }
                    after_var_positional = true;
                }
                ParamKind::KeywordOnly => {}
                ParamKind::VarKeyword => after_var_keyword = true,
            }
        }

        Ok(Signature {
            parameters: self.parameters,
            return_annotation: self.return_annotation,
        })
    }
}

/// Parameter names bound to the values supplied for them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundArguments {
    arguments: IndexMap<String, Value>,
}

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.arguments.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for BoundArguments {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.into_iter()
    }
}
