//! Structural validator walking type descriptors and values together

use super::{
    Annotations, ExtraOptions, FieldErrors, FieldIssue, FieldPath, Replacements, Validator,
    ValidatorError, Values,
};
use crate::core::types::{RecordSchema, TypeDescriptor};
use crate::core::value::{Record, Value};
use indexmap::IndexMap;

/// Extra option allowing unknown keys in record values
pub const ALLOW_EXTRA_FIELDS: &str = "allow_extra_fields";

/// How strictly scalar values must match their annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// Only exact kinds conform (`"1"` is not an `int`, `1` is not a `float`)
    #[default]
    Strict,
    /// Numeric strings, integral floats and scalars convert where unambiguous
    Lax,
}

/// Default validation engine
///
/// Reports every failing leaf with its full path. Raw mappings validated
/// against a record descriptor are promoted to [`Record`] instances. With
/// `replace` set, only fields whose normalized value differs from the input
/// are returned, so validating already-normalized values yields nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator {
    mode: CoercionMode,
}

impl SchemaValidator {
    pub fn strict() -> Self {
        Self {
            mode: CoercionMode::Strict,
        }
    }

    pub fn lax() -> Self {
        Self {
            mode: CoercionMode::Lax,
        }
    }

    pub fn mode(&self) -> CoercionMode {
        self.mode
    }
}

impl Validator for SchemaValidator {
    fn validate(
        &self,
        annotations: &Annotations,
        values: &Values,
        replace: bool,
        extra: &ExtraOptions,
    ) -> Result<Option<Replacements>, ValidatorError> {
        let allow_extra = extra
            .get(ALLOW_EXTRA_FIELDS)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let mut walker = Walker::new(self.mode, allow_extra);
        let mut replacements = Replacements::new();

        for (name, annotation) in annotations {
            let mut path = FieldPath::root(name.clone());
            let Some(value) = values.get(name) else {
                walker.issue(&path, "field required");
                continue;
            };
            match walker.visit(annotation, value, &mut path) {
                Some(normalized) if replace && normalized != *value => {
                    replacements.insert(name.clone(), normalized);
                }
                _ => {}
            }
        }

        for name in values.keys().filter(|name| !annotations.contains_key(*name)) {
            walker.issue(&FieldPath::root(name.clone()), "extra fields not permitted");
        }

        if let Some(message) = walker.schema_error {
            return Err(ValidatorError::schema(message));
        }
        if !walker.issues.is_empty() {
            return Err(ValidatorError::Invalid(FieldErrors(walker.issues)));
        }
        Ok((replace && !replacements.is_empty()).then_some(replacements))
    }

    fn name(&self) -> &str {
        match self.mode {
            CoercionMode::Strict => "schema",
            CoercionMode::Lax => "schema-lax",
        }
    }
}

struct Walker {
    mode: CoercionMode,
    allow_extra: bool,
    issues: Vec<FieldIssue>,
    schema_error: Option<String>,
}

impl Walker {
    fn new(mode: CoercionMode, allow_extra: bool) -> Self {
        Self {
            mode,
            allow_extra,
            issues: Vec::new(),
            schema_error: None,
        }
    }

    fn issue(&mut self, path: &FieldPath, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            path: path.clone(),
            message: message.into(),
        });
    }

    fn mismatch(&mut self, path: &FieldPath, ty: &TypeDescriptor, value: &Value) -> Option<Value> {
        self.issue(path, format!("expected {}, got {}", ty, value.kind()));
        None
    }

    fn lax(&self) -> bool {
        self.mode == CoercionMode::Lax
    }

    /// Check `value` against `ty`, returning its normalized form on success
    fn visit(&mut self, ty: &TypeDescriptor, value: &Value, path: &mut FieldPath) -> Option<Value> {
        match ty {
            TypeDescriptor::Any => Some(value.clone()),
            TypeDescriptor::None => match value {
                Value::Null => Some(Value::Null),
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::Bool => match (value, self.lax()) {
                (Value::Bool(_), _) => Some(value.clone()),
                (Value::Int(i @ (0 | 1)), true) => Some(Value::Bool(*i == 1)),
                (Value::Str(s), true) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" => Some(Value::Bool(true)),
                    "false" | "0" => Some(Value::Bool(false)),
                    _ => self.mismatch(path, ty, value),
                },
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::Int => match (value, self.lax()) {
                (Value::Int(_), _) => Some(value.clone()),
                // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound
                (Value::Float(f), true)
                    if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
                {
                    Some(Value::Int(*f as i64))
                }
                (Value::Str(s), true) => match s.trim().parse::<i64>() {
                    Ok(i) => Some(Value::Int(i)),
                    Err(_) => self.mismatch(path, ty, value),
                },
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::Float => match (value, self.lax()) {
                (Value::Float(_), _) => Some(value.clone()),
                (Value::Int(i), true) => Some(Value::Float(*i as f64)),
                (Value::Str(s), true) => match s.trim().parse::<f64>() {
                    Ok(f) => Some(Value::Float(f)),
                    Err(_) => self.mismatch(path, ty, value),
                },
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::Str => match (value, self.lax()) {
                (Value::Str(_), _) => Some(value.clone()),
                (Value::Int(i), true) => Some(Value::Str(i.to_string())),
                (Value::Float(f), true) => Some(Value::Str(f.to_string())),
                (Value::Bool(b), true) => Some(Value::Str(b.to_string())),
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::Format(format) => match value {
                Value::Str(s) if format.matches(s) => Some(value.clone()),
                Value::Str(_) => {
                    self.issue(path, format!("value is not a valid {}", format));
                    None
                }
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::List(inner) => match value {
                Value::List(items) => self.visit_items(items.iter().map(|item| (inner.as_ref(), item)), path),
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::Tuple(types) => match value {
                Value::List(items) if items.len() == types.len() => {
                    self.visit_items(types.iter().zip(items), path)
                }
                Value::List(items) => {
                    self.issue(
                        path,
                        format!("expected {} items, got {}", types.len(), items.len()),
                    );
                    None
                }
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::Map(inner) => match (value, self.lax()) {
                (Value::Map(map), _) => self.visit_map(inner, map, path),
                (Value::Record(record), true) => self.visit_map(inner, record.fields(), path),
                _ => self.mismatch(path, ty, value),
            },
            TypeDescriptor::Optional(inner) => match value {
                Value::Null => Some(Value::Null),
                _ => self.visit(inner, value, path),
            },
            TypeDescriptor::Union(variants) => self.visit_union(ty, variants, value, path),
            TypeDescriptor::Literal(allowed) => {
                if allowed.is_empty() {
                    self.schema_error = Some(format!("{}: Literal requires at least one value", path));
                    None
                } else if allowed.contains(value) {
                    Some(value.clone())
                } else {
                    self.issue(path, format!("expected {}, got {}", ty, value));
                    None
                }
            }
            TypeDescriptor::Record(schema) => self.visit_record(schema, value, path),
            TypeDescriptor::Native(native) => match native.check(value.to_json()) {
                Ok(json) => Some(match Value::from(json) {
                    Value::Map(fields) => Value::Record(Record::new(native.name(), fields)),
                    other => other,
                }),
                Err(message) => {
                    self.issue(path, message);
                    None
                }
            },
        }
    }

    fn visit_items<'a>(
        &mut self,
        pairs: impl Iterator<Item = (&'a TypeDescriptor, &'a Value)>,
        path: &mut FieldPath,
    ) -> Option<Value> {
        let mut normalized = Vec::new();
        let mut failed = false;
        for (index, (ty, item)) in pairs.enumerate() {
            path.push_index(index);
            match self.visit(ty, item, path) {
                Some(value) => normalized.push(value),
                None => failed = true,
            }
            path.pop();
        }
        (!failed).then_some(Value::List(normalized))
    }

    fn visit_map(
        &mut self,
        inner: &TypeDescriptor,
        map: &IndexMap<String, Value>,
        path: &mut FieldPath,
    ) -> Option<Value> {
        let mut normalized = IndexMap::new();
        let mut failed = false;
        for (key, item) in map {
            path.push_key(key.clone());
            match self.visit(inner, item, path) {
                Some(value) => {
                    normalized.insert(key.clone(), value);
                }
                None => failed = true,
            }
            path.pop();
        }
        (!failed).then_some(Value::Map(normalized))
    }

    fn visit_union(
        &mut self,
        ty: &TypeDescriptor,
        variants: &[TypeDescriptor],
        value: &Value,
        path: &mut FieldPath,
    ) -> Option<Value> {
        if variants.is_empty() {
            self.schema_error = Some(format!("{}: Union requires at least one variant", path));
            return None;
        }
        // Exact matches take precedence over coercions
        let mut modes = vec![CoercionMode::Strict];
        if self.lax() {
            modes.push(CoercionMode::Lax);
        }
        for mode in modes {
            for variant in variants {
                let mut scratch = Walker::new(mode, self.allow_extra);
                let result = scratch.visit(variant, value, path);
                if scratch.schema_error.is_some() {
                    self.schema_error = scratch.schema_error;
                    return None;
                }
                if result.is_some() {
                    return result;
                }
            }
        }
        self.issue(path, format!("value does not match any variant of {}", ty));
        None
    }

    fn visit_record(
        &mut self,
        schema: &RecordSchema,
        value: &Value,
        path: &mut FieldPath,
    ) -> Option<Value> {
        let input = match value {
            Value::Map(map) => map,
            Value::Record(record) if record.type_name() == schema.name || self.lax() => {
                record.fields()
            }
            _ => {
                self.issue(
                    path,
                    format!("expected {}, got {}", schema.name, describe(value)),
                );
                return None;
            }
        };

        let mut fields = IndexMap::new();
        let mut failed = false;

        for field in &schema.fields {
            path.push_key(field.name.clone());
            match input.get(&field.name) {
                Some(item) => match self.visit(&field.ty, item, path) {
                    Some(normalized) => {
                        fields.insert(field.name.clone(), normalized);
                    }
                    None => failed = true,
                },
                None => match &field.default {
                    Some(default) => {
                        fields.insert(field.name.clone(), default.clone());
                    }
                    None => {
                        self.issue(path, "field required");
                        failed = true;
                    }
                },
            }
            path.pop();
        }

        for (key, item) in input.iter().filter(|(key, _)| schema.get(key).is_none()) {
            if self.allow_extra {
                fields.insert(key.clone(), item.clone());
            } else {
                path.push_key(key.clone());
                self.issue(path, "extra fields not permitted");
                path.pop();
                failed = true;
            }
        }

        (!failed).then(|| Value::Record(Record::new(schema.name.clone(), fields)))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Record(record) => format!("record {}", record.type_name()),
        other => other.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::StringFormat;
    use serde_json::json;

    fn single(name: &str, ty: TypeDescriptor, value: impl Into<Value>) -> (Annotations, Values) {
        let mut annotations = Annotations::new();
        annotations.insert(name.to_string(), ty);
        let mut values = Values::new();
        values.insert(name.to_string(), value.into());
        (annotations, values)
    }

    fn run(
        validator: SchemaValidator,
        ty: TypeDescriptor,
        value: impl Into<Value>,
    ) -> Result<Option<Replacements>, ValidatorError> {
        let (annotations, values) = single("x", ty, value);
        validator.validate(&annotations, &values, true, &ExtraOptions::new())
    }

    fn issues(result: Result<Option<Replacements>, ValidatorError>) -> Vec<(String, String)> {
        match result {
            Err(ValidatorError::Invalid(errors)) => errors
                .issues()
                .iter()
                .map(|i| (i.path.to_string(), i.message.clone()))
                .collect(),
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_scalars() {
        let strict = SchemaValidator::strict();
        assert!(run(strict, TypeDescriptor::Int, 1).expect("valid").is_none());
        assert!(run(strict, TypeDescriptor::Str, "a").expect("valid").is_none());
        assert!(run(strict, TypeDescriptor::Bool, true).expect("valid").is_none());
        assert!(run(strict, TypeDescriptor::Float, 1.5).expect("valid").is_none());

        assert_eq!(
            issues(run(strict, TypeDescriptor::Int, "1")),
            vec![("x".to_string(), "expected int, got str".to_string())]
        );
        assert_eq!(
            issues(run(strict, TypeDescriptor::Str, 2)),
            vec![("x".to_string(), "expected str, got int".to_string())]
        );
        assert!(run(strict, TypeDescriptor::Float, 1).is_err());
    }

    #[test]
    fn test_lax_coercions_are_reported_as_replacements() {
        let lax = SchemaValidator::lax();
        let replaced = run(lax, TypeDescriptor::Int, "42")
            .expect("coerces")
            .expect("replaced");
        assert_eq!(replaced.get("x"), Some(&Value::Int(42)));

        let replaced = run(lax, TypeDescriptor::Float, 3)
            .expect("coerces")
            .expect("replaced");
        assert_eq!(replaced.get("x"), Some(&Value::Float(3.0)));

        let replaced = run(lax, TypeDescriptor::Bool, "false")
            .expect("coerces")
            .expect("replaced");
        assert_eq!(replaced.get("x"), Some(&Value::Bool(false)));

        assert!(run(lax, TypeDescriptor::Int, "forty-two").is_err());
        assert!(run(lax, TypeDescriptor::Int, 1.5).is_err());
    }

    #[test]
    fn test_lax_int_rejects_out_of_range_floats() {
        let lax = SchemaValidator::lax();
        for f in [1e20, -1e20, 9_223_372_036_854_775_808.0, f64::INFINITY, f64::NAN] {
            assert_eq!(
                issues(run(lax, TypeDescriptor::Int, f)),
                vec![("x".to_string(), "expected int, got float".to_string())]
            );
        }

        let replaced = run(lax, TypeDescriptor::Int, -9_223_372_036_854_775_808.0)
            .expect("i64::MIN is representable")
            .expect("replaced");
        assert_eq!(replaced.get("x"), Some(&Value::Int(i64::MIN)));
    }

    #[test]
    fn test_none_type_accepts_only_null() {
        let strict = SchemaValidator::strict();
        assert!(run(strict, TypeDescriptor::None, Value::Null).expect("valid").is_none());
        assert_eq!(
            issues(run(strict, TypeDescriptor::None, "1")),
            vec![("x".to_string(), "expected None, got str".to_string())]
        );
    }

    #[test]
    fn test_optional_union_and_literal() {
        let strict = SchemaValidator::strict();
        let optional = TypeDescriptor::optional(TypeDescriptor::Int);
        assert!(run(strict, optional.clone(), Value::Null).is_ok());
        assert!(run(strict, optional, 3).is_ok());

        let union = TypeDescriptor::union([TypeDescriptor::Int, TypeDescriptor::Str]);
        assert!(run(strict, union.clone(), "a").is_ok());
        assert_eq!(
            issues(run(strict, union, true)),
            vec![(
                "x".to_string(),
                "value does not match any variant of Union[int, str]".to_string()
            )]
        );

        let colors = TypeDescriptor::literal(["red", "green"]);
        assert!(run(strict, colors.clone(), "red").is_ok());
        assert!(run(strict, colors, "blue").is_err());
    }

    #[test]
    fn test_lax_union_prefers_exact_match() {
        let union = TypeDescriptor::union([TypeDescriptor::Int, TypeDescriptor::Str]);
        let result = run(SchemaValidator::lax(), union, "7").expect("valid");
        assert!(result.is_none(), "\"7\" is already a str and must stay one");
    }

    #[test]
    fn test_string_formats() {
        let strict = SchemaValidator::strict();
        let email = TypeDescriptor::Format(StringFormat::Email);
        assert!(run(strict, email.clone(), "a@example.com").is_ok());
        assert_eq!(
            issues(run(strict, email, "nope")),
            vec![("x".to_string(), "value is not a valid email".to_string())]
        );
    }

    #[test]
    fn test_list_errors_carry_indices() {
        let strict = SchemaValidator::strict();
        let result = run(strict, TypeDescriptor::list(TypeDescriptor::Int), vec![
            Value::Int(1),
            Value::from("2"),
            Value::Int(3),
            Value::from("4"),
        ]);
        let paths: Vec<_> = issues(result).into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["x.1", "x.3"]);
    }

    #[test]
    fn test_tuple_length_mismatch() {
        let strict = SchemaValidator::strict();
        let pair = TypeDescriptor::tuple([TypeDescriptor::Int, TypeDescriptor::Str]);
        assert!(run(strict, pair.clone(), Value::from(json!([1, "a"]))).is_ok());
        assert_eq!(
            issues(run(strict, pair, Value::from(json!([1])))),
            vec![("x".to_string(), "expected 2 items, got 1".to_string())]
        );
    }

    #[test]
    fn test_record_promotion_and_idempotence() {
        let strict = SchemaValidator::strict();
        let profile = TypeDescriptor::record(
            RecordSchema::new("Profile")
                .field("age", TypeDescriptor::Int)
                .field_with_default("city", TypeDescriptor::Str, "Samara"),
        );

        let replaced = run(strict, profile.clone(), Value::from(json!({"age": 22})))
            .expect("valid")
            .expect("promoted to a record");
        let record = replaced.get("x").cloned().expect("x replaced");
        assert_eq!(record.as_record().map(Record::type_name), Some("Profile"));
        assert_eq!(record.field("city"), Some(&Value::from("Samara")));

        // Validating the record again finds nothing to replace
        assert!(run(strict, profile, record).expect("valid").is_none());
    }

    #[test]
    fn test_record_missing_and_extra_fields() {
        let strict = SchemaValidator::strict();
        let profile = TypeDescriptor::record(
            RecordSchema::new("Profile")
                .field("age", TypeDescriptor::Int)
                .field("city", TypeDescriptor::Str),
        );
        let result = run(strict, profile.clone(), Value::from(json!({"age": 22, "zip": "x"})));
        assert_eq!(
            issues(result),
            vec![
                ("x.city".to_string(), "field required".to_string()),
                ("x.zip".to_string(), "extra fields not permitted".to_string()),
            ]
        );

        let (annotations, values) =
            single("x", profile, Value::from(json!({"age": 22, "city": "Kazan", "zip": "x"})));
        let mut extra = ExtraOptions::new();
        extra.insert(ALLOW_EXTRA_FIELDS.to_string(), Value::Bool(true));
        let replaced = strict
            .validate(&annotations, &values, true, &extra)
            .expect("extras allowed")
            .expect("promoted");
        assert_eq!(replaced["x"].field("zip"), Some(&Value::from("x")));
    }

    #[test]
    fn test_record_of_another_type_is_rejected_in_strict_mode() {
        let a = RecordSchema::new("A").field("v", TypeDescriptor::Int);
        let b = RecordSchema::new("B").field("v", TypeDescriptor::Int);
        let b_value = run(SchemaValidator::strict(), TypeDescriptor::record(b), Value::from(json!({"v": 1})))
            .expect("valid")
            .expect("promoted")
            .shift_remove("x")
            .expect("x replaced");

        assert_eq!(
            issues(run(SchemaValidator::strict(), TypeDescriptor::record(a.clone()), b_value.clone())),
            vec![("x".to_string(), "expected A, got record B".to_string())]
        );
        assert!(run(SchemaValidator::lax(), TypeDescriptor::record(a), b_value).is_ok());
    }

    #[test]
    fn test_replace_false_returns_none() {
        let profile = TypeDescriptor::record(RecordSchema::new("P").field("a", TypeDescriptor::Int));
        let (annotations, values) = single("x", profile, Value::from(json!({"a": 1})));
        let result = SchemaValidator::strict()
            .validate(&annotations, &values, false, &ExtraOptions::new())
            .expect("valid");
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_value_and_unannotated_value() {
        let mut annotations = Annotations::new();
        annotations.insert("a".to_string(), TypeDescriptor::Int);
        let mut values = Values::new();
        values.insert("b".to_string(), Value::Int(1));

        let result = SchemaValidator::strict().validate(&annotations, &values, false, &ExtraOptions::new());
        assert_eq!(
            issues(result),
            vec![
                ("a".to_string(), "field required".to_string()),
                ("b".to_string(), "extra fields not permitted".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_annotation_is_schema_error() {
        let result = run(SchemaValidator::strict(), TypeDescriptor::Union(vec![]), 1);
        let err = result.expect_err("empty union");
        assert_eq!(err.kind(), "SchemaError");
        assert!(err.to_string().contains("Union requires at least one variant"));
    }

    #[test]
    fn test_validator_names() {
        assert_eq!(SchemaValidator::strict().name(), "schema");
        assert_eq!(SchemaValidator::lax().name(), "schema-lax");
        assert_eq!(SchemaValidator::default().mode(), CoercionMode::Strict);
    }
}
