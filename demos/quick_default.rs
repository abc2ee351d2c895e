//! Bare and parameterized decoration with the default schema validator

use serde_json::json;
use tracing_subscriber::EnvFilter;
use valdec::prelude::*;

// (i: int, s: str) -> int
fn int_str() -> Result<Signature> {
    Ok(Signature::builder()
        .arg("i", TypeDescriptor::Int)
        .arg("s", TypeDescriptor::Str)
        .returns(TypeDescriptor::Int)
        .build()?)
}

fn first(call: CallArgs) -> Result<Value> {
    Ok(call.get(0).cloned().unwrap_or_default())
}

fn first_as_int(call: CallArgs) -> Result<Value> {
    let first = call.get(0).cloned().unwrap_or_default();
    Ok(match first.as_str().map(str::parse::<i64>) {
        Some(Ok(i)) => Value::Int(i),
        _ => first,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🚀 Valdec Quick Start\n");

    // Everything annotated, and the return value
    let f = validate!(first, int_str()?);
    assert_eq!(f.call(CallArgs::new().arg(1).arg("s"))?, Value::Int(1));
    println!("✅ validate!(f): f(1, \"s\") == 1");

    // Only "s"
    let f = validate!("s").wrap(int_str()?, first);
    assert_eq!(
        f.call(CallArgs::new().arg("not int").arg("s"))?,
        Value::from("not int")
    );
    println!("✅ validate!(\"s\"): f(\"not int\", \"s\") == \"not int\"");

    // Only "s" and the return value
    let f = validate!("s", "return").wrap(int_str()?, first_as_int);
    assert_eq!(f.call(CallArgs::new().arg("1").arg("s"))?, Value::Int(1));
    println!("✅ validate!(\"s\", \"return\"): f(\"1\", \"s\") == 1");

    // Everything except "i"
    let f = validate!("i"; exclude = true).wrap(int_str()?, first_as_int);
    assert_eq!(f.call(CallArgs::new().arg("1").arg("s"))?, Value::Int(1));
    println!("✅ validate!(\"i\"; exclude = true): f(\"1\", \"s\") == 1");

    // Raw mappings come back as records
    let profile = RecordSchema::new("Profile")
        .field("age", TypeDescriptor::Int)
        .field("city", TypeDescriptor::Str);
    let student = RecordSchema::new("Student")
        .field("name", TypeDescriptor::Str)
        .field("profile", TypeDescriptor::record(profile));
    let signature = Signature::builder()
        .arg("i", TypeDescriptor::Int)
        .arg("s", TypeDescriptor::Str)
        .arg("group", TypeDescriptor::list(TypeDescriptor::record(student)))
        .build()?;
    let f = validate!("group").wrap(signature, |call: CallArgs| {
        Ok(call.get(2).cloned().unwrap_or_default())
    });

    let group = json!([
        {"name": "Peter", "profile": {"age": 22, "city": "Samara"}},
        {"name": "Elena", "profile": {"age": 20, "city": "Kazan"}},
    ]);
    let result = f.call(
        CallArgs::new()
            .arg("any type")
            .arg("any type")
            .arg(Value::from(group.clone())),
    )?;

    for (i, student) in result.as_list().unwrap_or_default().iter().enumerate() {
        let profile = student.field("profile");
        assert_eq!(student.field("name").and_then(Value::as_str), group[i]["name"].as_str());
        assert_eq!(
            profile.and_then(|p| p.field("city")).and_then(Value::as_str),
            group[i]["profile"]["city"].as_str()
        );
        println!(
            "🎓 {} ({})",
            student.field("name").unwrap_or(&Value::Null),
            profile.and_then(|p| p.field("age")).unwrap_or(&Value::Null)
        );
    }

    Ok(())
}
