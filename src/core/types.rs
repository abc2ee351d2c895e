//! Type descriptors used as parameter and return annotations
//!
//! A [`TypeDescriptor`] is a runtime tree describing the expected shape of a
//! value. Validators walk a descriptor and a [`Value`] together instead of
//! generating a dedicated type for every call.

use crate::core::value::Value;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Declared type of a parameter or return value
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// Accepts any value
    Any,
    /// The null/absence type; only `Value::Null` conforms
    None,
    Bool,
    Int,
    Float,
    Str,
    /// A string in a specific format
    Format(StringFormat),
    /// Homogeneous list
    List(Box<TypeDescriptor>),
    /// Fixed-length list with a descriptor per position
    Tuple(Vec<TypeDescriptor>),
    /// Mapping from string keys to values of one type
    Map(Box<TypeDescriptor>),
    /// `None` or the inner type
    Optional(Box<TypeDescriptor>),
    /// First matching variant wins
    Union(Vec<TypeDescriptor>),
    /// One of a fixed set of values
    Literal(Vec<Value>),
    /// Named structure with typed fields
    Record(Arc<RecordSchema>),
    /// A Rust type checked through its serde implementation
    Native(NativeType),
}

impl TypeDescriptor {
    pub fn list(inner: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(inner))
    }

    pub fn map(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(inner))
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional(Box::new(inner))
    }

    pub fn union(variants: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Union(variants.into_iter().collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Tuple(items.into_iter().collect())
    }

    pub fn literal<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        TypeDescriptor::Literal(values.into_iter().map(Into::into).collect())
    }

    pub fn record(schema: RecordSchema) -> Self {
        TypeDescriptor::Record(Arc::new(schema))
    }

    pub fn native<T>() -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        TypeDescriptor::Native(NativeType::of::<T>())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Any => write!(f, "Any"),
            TypeDescriptor::None => write!(f, "None"),
            TypeDescriptor::Bool => write!(f, "bool"),
            TypeDescriptor::Int => write!(f, "int"),
            TypeDescriptor::Float => write!(f, "float"),
            TypeDescriptor::Str => write!(f, "str"),
            TypeDescriptor::Format(format) => write!(f, "{}", format),
            TypeDescriptor::List(inner) => write!(f, "list[{}]", inner),
            TypeDescriptor::Tuple(items) => write!(f, "tuple[{}]", join(items)),
            TypeDescriptor::Map(inner) => write!(f, "dict[str, {}]", inner),
            TypeDescriptor::Optional(inner) => write!(f, "Optional[{}]", inner),
            TypeDescriptor::Union(variants) => write!(f, "Union[{}]", join(variants)),
            TypeDescriptor::Literal(values) => write!(f, "Literal[{}]", join(values)),
            TypeDescriptor::Record(schema) => write!(f, "{}", schema.name),
            TypeDescriptor::Native(native) => write!(f, "{}", native.name),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// String formats with dedicated checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    Url,
    Uuid,
    /// `YYYY-MM-DD`
    Date,
    /// RFC 3339 timestamp
    DateTime,
}

impl StringFormat {
    /// Check a string against this format
    pub fn matches(&self, value: &str) -> bool {
        match self {
            StringFormat::Email => Self::is_valid_email(value),
            StringFormat::Url => Self::is_valid_url(value),
            StringFormat::Uuid => uuid::Uuid::parse_str(value).is_ok(),
            StringFormat::Date => chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            StringFormat::DateTime => chrono::DateTime::parse_from_rfc3339(value).is_ok(),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
        EMAIL_REGEX
            .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok())
            .as_ref()
            .is_some_and(|regex| regex.is_match(email))
    }

    fn is_valid_url(url: &str) -> bool {
        static URL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
        URL_REGEX
            .get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").ok())
            .as_ref()
            .is_some_and(|regex| regex.is_match(url))
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StringFormat::Email => "email",
            StringFormat::Url => "url",
            StringFormat::Uuid => "uuid",
            StringFormat::Date => "date",
            StringFormat::DateTime => "datetime",
        };
        write!(f, "{}", name)
    }
}

/// Schema of a named record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<RecordField>,
}

/// A single field of a record schema
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub ty: TypeDescriptor,
    /// Value used when the field is missing; `None` makes the field required
    pub default: Option<Value>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a required field
    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(RecordField {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    /// Add a field with a default value
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(RecordField {
            name: name.into(),
            ty,
            default: Some(default.into()),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

type NativeCheck = dyn Fn(serde_json::Value) -> Result<serde_json::Value, String> + Send + Sync;

/// A descriptor backed by a Rust type's serde implementation
///
/// Values are checked by deserializing them into the type, and normalized by
/// serializing the typed value back.
#[derive(Clone)]
pub struct NativeType {
    name: String,
    check: Arc<NativeCheck>,
}

impl NativeType {
    /// Build a descriptor for `T`, named after its last path segment
    pub fn of<T>() -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        Self::named::<T>(short_type_name(std::any::type_name::<T>()))
    }

    /// Build a descriptor for `T` with an explicit name
    pub fn named<T>(name: impl Into<String>) -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(|json| {
                let typed: T = serde_json::from_value(json).map_err(|e| e.to_string())?;
                serde_json::to_value(&typed).map_err(|e| e.to_string())
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Round-trip a JSON value through the native type
    pub fn check(&self, json: serde_json::Value) -> Result<serde_json::Value, String> {
        (self.check)(json)
    }
}

impl fmt::Debug for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeType").field("name", &self.name).finish()
    }
}

impl PartialEq for NativeType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.check, &other.check)
    }
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[test]
    fn test_descriptor_display() {
        let student = RecordSchema::new("Student").field("name", TypeDescriptor::Str);
        assert_eq!(
            TypeDescriptor::list(TypeDescriptor::record(student)).to_string(),
            "list[Student]"
        );
        assert_eq!(
            TypeDescriptor::optional(TypeDescriptor::Str).to_string(),
            "Optional[str]"
        );
        assert_eq!(
            TypeDescriptor::union([TypeDescriptor::Int, TypeDescriptor::None]).to_string(),
            "Union[int, None]"
        );
        assert_eq!(
            TypeDescriptor::literal(["red", "blue"]).to_string(),
            r#"Literal["red", "blue"]"#
        );
        assert_eq!(
            TypeDescriptor::map(TypeDescriptor::Float).to_string(),
            "dict[str, float]"
        );
    }

    #[test]
    fn test_email_format() {
        let format = StringFormat::Email;
        assert!(format.matches("test@example.com"));
        assert!(format.matches("user.name+tag@example.co.uk"));
        assert!(!format.matches("invalid-email"));
        assert!(!format.matches("@example.com"));
    }

    #[test]
    fn test_url_format() {
        let format = StringFormat::Url;
        assert!(format.matches("https://example.com"));
        assert!(format.matches("http://test.com/path?query=1"));
        assert!(!format.matches("not a url"));
    }

    #[test]
    fn test_uuid_and_date_formats() {
        assert!(StringFormat::Uuid.matches(&uuid::Uuid::new_v4().to_string()));
        assert!(!StringFormat::Uuid.matches("not-a-uuid"));
        assert!(StringFormat::Date.matches("2024-01-15"));
        assert!(!StringFormat::Date.matches("15/01/2024"));
        assert!(StringFormat::DateTime.matches("2024-01-15T10:00:00Z"));
        assert!(!StringFormat::DateTime.matches("2024-01-15"));
    }

    #[test]
    fn test_record_schema_builder() {
        let schema = RecordSchema::new("Profile")
            .field("age", TypeDescriptor::Int)
            .field_with_default("city", TypeDescriptor::Str, "Kazan");

        assert_eq!(schema.fields.len(), 2);
        assert!(schema.get("age").is_some_and(|f| f.default.is_none()));
        assert_eq!(
            schema.get("city").and_then(|f| f.default.clone()),
            Some(Value::from("Kazan"))
        );
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn test_native_type_name_and_check() {
        let native = NativeType::of::<Point>();
        assert_eq!(native.name(), "Point");
        assert!(native.check(serde_json::json!({"x": 1, "y": 2})).is_ok());

        let err = native
            .check(serde_json::json!({"x": 1}))
            .expect_err("missing field should fail");
        assert!(err.contains("y"));
    }

    #[test]
    fn test_short_type_name_strips_paths_and_generics() {
        assert_eq!(short_type_name("my_crate::models::Point"), "Point");
        assert_eq!(short_type_name("alloc::vec::Vec<my_crate::Point>"), "Vec");
    }
}
