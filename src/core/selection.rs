//! Include/exclude selection of annotated fields

use crate::core::field::Field;

/// Reserved selection name for the return value
pub const RETURN_NAME: &str = "return";

/// Key under which the return value is handed to validators
///
/// Kept distinct from [`RETURN_NAME`] so a validator never confuses the
/// return value with a parameter selected by the reserved keyword.
pub const RESULT_KEY: &str = "result";

/// Names subject to (or excluded from) validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    names: Vec<String>,
    exclude: bool,
}

impl Selection {
    /// Validate everything annotated
    pub fn all() -> Self {
        Self::default()
    }

    /// Validate only the given names
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            exclude: false,
        }
    }

    /// Validate everything annotated except the given names
    pub fn except<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            exclude: true,
        }
    }

    /// Build from raw decorator arguments
    ///
    /// When no arguments are given, or the first one is the decorated callable
    /// itself, the selection is empty and everything annotated is validated.
    pub fn from_decorator_args(args: &[DecoratorArg], exclude: bool) -> Self {
        Self {
            names: names_from_decorator_args(args),
            exclude,
        }
    }

    pub fn with_exclude(mut self, exclude: bool) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_exclude(&self) -> bool {
        self.exclude
    }

    /// Whether a field with this name passes the selection
    pub fn includes(&self, name: &str) -> bool {
        let listed = self.names.iter().any(|n| n == name);
        if self.exclude {
            !listed
        } else {
            self.names.is_empty() || listed
        }
    }

    /// Keep the fields that pass the selection, in their original order
    pub fn select(&self, fields: Vec<Field>) -> Vec<Field> {
        fields
            .into_iter()
            .filter(|field| self.includes(&field.name))
            .collect()
    }
}

/// A positional argument given to the decorator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoratorArg {
    /// The decorated callable itself (bare application)
    Callable,
    /// A field name (parameterized application)
    Name(String),
}

impl From<&str> for DecoratorArg {
    fn from(name: &str) -> Self {
        DecoratorArg::Name(name.to_string())
    }
}

impl From<String> for DecoratorArg {
    fn from(name: String) -> Self {
        DecoratorArg::Name(name)
    }
}

/// Field names carried by decorator arguments
///
/// Empty when there are no arguments or the first is a callable.
pub fn names_from_decorator_args(args: &[DecoratorArg]) -> Vec<String> {
    match args.first() {
        None | Some(DecoratorArg::Callable) => Vec::new(),
        Some(DecoratorArg::Name(_)) => args
            .iter()
            .filter_map(|arg| match arg {
                DecoratorArg::Name(name) => Some(name.clone()),
                DecoratorArg::Callable => None,
            })
            .collect(),
    }
}
