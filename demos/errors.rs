//! Argument and return validation failures

use tracing_subscriber::EnvFilter;
use valdec::prelude::*;

// (i: int, s: Optional[str] = None)
fn signature() -> Result<Signature> {
    Ok(Signature::builder()
        .arg("i", TypeDescriptor::Int)
        .param(
            Parameter::positional_or_keyword("s")
                .typed(TypeDescriptor::optional(TypeDescriptor::Str))
                .default(Value::Null),
        )
        .build()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // All annotated arguments and the return value
    let bar_1 = validate!(|_: CallArgs| Ok(Value::Null), signature()?);

    bar_1.call(CallArgs::new().arg(1).arg("2"))?;
    println!("✅ bar_1(1, \"2\")");

    match bar_1.call(CallArgs::new().arg(1).arg(2)) {
        Err(error @ ValdecError::Arguments(_)) => {
            println!("❌ {}: {}\n", error.error_code(), error);
        }
        other => anyhow::bail!("expected an arguments error, got {:?}", other),
    }

    // Only the return value, which must be None
    let bar_2 = validate!("return").wrap(signature()?, |call: CallArgs| {
        Ok(call.get(0).cloned().unwrap_or_default())
    });

    bar_2.call(CallArgs::new().arg(Value::Null).arg(1))?;
    println!("✅ bar_2(None, 1)");

    match bar_2.call(CallArgs::new().arg(1).arg(2)) {
        Err(error @ ValdecError::Return(_)) => {
            println!("❌ {}: {}", error.error_code(), error);
        }
        other => anyhow::bail!("expected a return error, got {:?}", other),
    }

    Ok(())
}
