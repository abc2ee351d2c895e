//! The schema validator driven directly, as a validation engine

use serde::{Deserialize, Serialize};
use serde_json::json;
use valdec::prelude::*;

fn student_schema() -> RecordSchema {
    let profile = RecordSchema::new("Profile")
        .field("age", TypeDescriptor::Int)
        .field("city", TypeDescriptor::Str);
    RecordSchema::new("Student")
        .field("name", TypeDescriptor::Str)
        .field("profile", TypeDescriptor::record(profile))
}

fn group() -> serde_json::Value {
    json!([
        {"name": "Peter", "profile": {"age": 22, "city": "Samara"}},
        {"name": "Elena", "profile": {"age": 20, "city": "Kazan"}},
    ])
}

fn inputs(group: serde_json::Value) -> (Annotations, Values) {
    let mut annotations = Annotations::new();
    annotations.insert(
        "group".to_string(),
        TypeDescriptor::list(TypeDescriptor::record(student_schema())),
    );
    annotations.insert("specialty".to_string(), TypeDescriptor::Str);

    let mut values = Values::new();
    values.insert("group".to_string(), Value::from(group));
    values.insert("specialty".to_string(), Value::from("programmers"));
    (annotations, values)
}

#[test]
fn test_nested_records_without_replace() {
    let (annotations, values) = inputs(group());
    let result = SchemaValidator::strict()
        .validate(&annotations, &values, false, &ExtraOptions::new())
        .expect("valid");
    assert!(result.is_none());
}

#[test]
fn test_nested_records_are_replaced_with_records() {
    let (annotations, values) = inputs(group());
    let replacements = SchemaValidator::strict()
        .validate(&annotations, &values, true, &ExtraOptions::new())
        .expect("valid")
        .expect("records differ from raw maps");

    // unchanged fields are not returned
    assert!(!replacements.contains_key("specialty"));

    let raw = group();
    let students = replacements["group"].as_list().expect("a list");
    for (i, student) in students.iter().enumerate() {
        let record = student.as_record().expect("a record");
        assert_eq!(record.type_name(), "Student");
        assert_eq!(
            student.field("name").and_then(Value::as_str),
            raw[i]["name"].as_str()
        );
        let profile = student.field("profile").expect("profile");
        assert_eq!(
            profile.field("age").and_then(Value::as_int),
            raw[i]["profile"]["age"].as_i64()
        );
        assert_eq!(
            profile.field("city").and_then(Value::as_str),
            raw[i]["profile"]["city"].as_str()
        );
    }
}

#[test]
fn test_replaced_values_validate_unchanged() {
    let (annotations, values) = inputs(group());
    let validator = SchemaValidator::strict();
    let replacements = validator
        .validate(&annotations, &values, true, &ExtraOptions::new())
        .expect("valid")
        .expect("replaced");

    let mut again = values.clone();
    again.extend(replacements);
    let second = validator
        .validate(&annotations, &again, true, &ExtraOptions::new())
        .expect("still valid");
    assert!(second.is_none());
}

#[test]
fn test_nested_failure_names_the_whole_path() {
    let mut raw = group();
    raw[1]["profile"]["city"] = json!(1);
    let (annotations, values) = inputs(raw);

    let err = SchemaValidator::strict()
        .validate(&annotations, &values, false, &ExtraOptions::new())
        .expect_err("city is an int");
    assert_eq!(err.kind(), "ValidationError");

    let message = err.to_string();
    assert!(message.starts_with("1 validation error"));
    assert!(message.contains("group.1.profile.city"));
    assert!(message.contains("expected str, got int"));
}

#[test]
fn test_every_failing_leaf_is_reported() {
    let mut raw = group();
    raw[0]["name"] = json!(7);
    raw[1]["profile"]["age"] = json!("twenty");
    let (annotations, mut values) = inputs(raw);
    values.insert("specialty".to_string(), Value::Null);

    let ValidatorError::Invalid(errors) = SchemaValidator::strict()
        .validate(&annotations, &values, false, &ExtraOptions::new())
        .expect_err("three failures")
    else {
        panic!("expected field errors");
    };
    let paths: Vec<String> = errors.0.iter().map(|issue| issue.path.to_string()).collect();
    assert_eq!(paths, vec!["group.0.name", "group.1.profile.age", "specialty"]);
}

#[test]
fn test_lax_mode_coerces_leaves() {
    let mut raw = group();
    raw[0]["profile"]["age"] = json!("22");
    let (annotations, values) = inputs(raw);

    assert!(
        SchemaValidator::strict()
            .validate(&annotations, &values, true, &ExtraOptions::new())
            .is_err()
    );

    let replacements = SchemaValidator::lax()
        .validate(&annotations, &values, true, &ExtraOptions::new())
        .expect("coerced")
        .expect("replaced");
    let age = replacements["group"]
        .index(0)
        .and_then(|s| s.field("profile"))
        .and_then(|p| p.field("age"));
    assert_eq!(age, Some(&Value::Int(22)));
}

#[test]
fn test_unknown_record_keys() {
    let mut raw = group();
    raw[0]["nickname"] = json!("Pete");
    let (annotations, values) = inputs(raw);

    let err = SchemaValidator::strict()
        .validate(&annotations, &values, false, &ExtraOptions::new())
        .expect_err("extra key");
    assert!(err.to_string().contains("group.0.nickname"));

    let mut extra = ExtraOptions::new();
    extra.insert("allow_extra_fields".to_string(), Value::Bool(true));
    assert!(
        SchemaValidator::strict()
            .validate(&annotations, &values, false, &extra)
            .is_ok()
    );
}

#[derive(Debug, Serialize, Deserialize)]
struct Address {
    street: String,
    number: u32,
}

#[test]
fn test_native_type_uses_serde() {
    let mut annotations = Annotations::new();
    annotations.insert("address".to_string(), TypeDescriptor::native::<Address>());

    let mut values = Values::new();
    values.insert(
        "address".to_string(),
        Value::from(json!({"street": "Main", "number": 12})),
    );
    let replacements = SchemaValidator::strict()
        .validate(&annotations, &values, true, &ExtraOptions::new())
        .expect("valid")
        .expect("replaced");
    let address = replacements["address"].as_record().expect("a record");
    assert_eq!(address.type_name(), "Address");
    assert_eq!(address.get("number"), Some(&Value::Int(12)));

    values.insert(
        "address".to_string(),
        Value::from(json!({"street": "Main", "number": -1})),
    );
    let err = SchemaValidator::strict()
        .validate(&annotations, &values, false, &ExtraOptions::new())
        .expect_err("negative number");
    assert!(err.to_string().contains("address"));
}

#[test]
fn test_string_formats() {
    let mut annotations = Annotations::new();
    annotations.insert("email".to_string(), TypeDescriptor::Format(StringFormat::Email));
    annotations.insert("id".to_string(), TypeDescriptor::Format(StringFormat::Uuid));
    annotations.insert("day".to_string(), TypeDescriptor::Format(StringFormat::Date));

    let mut values = Values::new();
    values.insert("email".to_string(), Value::from("someone@example.com"));
    values.insert(
        "id".to_string(),
        Value::from("67e55044-10b1-426f-9247-bb680e5fe0c8"),
    );
    values.insert("day".to_string(), Value::from("2024-02-29"));
    assert!(
        SchemaValidator::strict()
            .validate(&annotations, &values, false, &ExtraOptions::new())
            .is_ok()
    );

    values.insert("day".to_string(), Value::from("2023-02-29"));
    let err = SchemaValidator::strict()
        .validate(&annotations, &values, false, &ExtraOptions::new())
        .expect_err("not a leap year");
    assert!(err.to_string().contains("value is not a valid date"));
}
