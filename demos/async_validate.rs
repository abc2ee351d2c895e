//! Validating a function whose result must be awaited

use std::time::Duration;
use tracing_subscriber::EnvFilter;
use valdec::prelude::*;

async fn fetch_user(call: CallArgs) -> Result<Value> {
    tokio::time::sleep(Duration::from_millis(10)).await;
    let id = call.get(0).and_then(Value::as_int).unwrap_or_default();
    Ok(Value::from(serde_json::json!({
        "id": id,
        "email": format!("user{}@example.com", id),
    })))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let user = RecordSchema::new("User")
        .field("id", TypeDescriptor::Int)
        .field("email", TypeDescriptor::Format(StringFormat::Email));
    let signature = Signature::builder()
        .arg("id", TypeDescriptor::Int)
        .returns(TypeDescriptor::record(user))
        .build()?;

    let fetch = validate!(async fetch_user, signature);

    let handles: Vec<_> = (1..=3)
        .map(|id| {
            let fetch = fetch.clone();
            tokio::spawn(async move { fetch.call(CallArgs::new().arg(id)).await })
        })
        .collect();

    for handle in handles {
        let user = handle.await??;
        println!(
            "👤 {} <{}>",
            user.field("id").unwrap_or(&Value::Null),
            user.field("email").unwrap_or(&Value::Null)
        );
    }

    match fetch.call(CallArgs::new().arg("1")).await {
        Err(error) => println!("❌ {}", error),
        Ok(user) => anyhow::bail!("expected a validation error, got {}", user),
    }

    Ok(())
}
