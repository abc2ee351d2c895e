//! Variadic parameters with a lax validator loaded from configuration

use tracing_subscriber::EnvFilter;
use valdec::prelude::*;

const CONFIG: &str = r#"
validator: lax
replace_args: true
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = ValidationConfig::from_yaml_str(CONFIG)?.into_settings();

    // (a1: int, a2: str, *args, k1: str, k2: int = 1, **kwargs)
    let signature = Signature::builder()
        .arg("a1", TypeDescriptor::Int)
        .arg("a2", TypeDescriptor::Str)
        .param(Parameter::var_positional("args"))
        .param(Parameter::keyword_only("k1").typed(TypeDescriptor::Str))
        .param(
            Parameter::keyword_only("k2")
                .typed(TypeDescriptor::Int)
                .default(1),
        )
        .param(Parameter::var_keyword("kwargs"))
        .build()?;

    let func = Validate::all()
        .settings(settings)
        .wrap(signature, |call: CallArgs| {
            println!("   called with {:?} {:?}", call.args, call.kwargs);
            Ok(Value::Null)
        });

    let base = || CallArgs::new().arg(1).arg("2").arg(3).arg(4).arg(5);

    func.call(base().kwarg("k1", "6").kwarg("k2", 7).kwarg("k3", "any"))?;
    println!("✅ all arguments valid");

    // The lax validator coerces "7" into 7 before the call
    func.call(base().kwarg("k1", "6").kwarg("k2", "7").kwarg("k3", "any"))?;
    println!("✅ k2 coerced from \"7\"");

    let cases = [
        ("k2", base().kwarg("k1", "6").kwarg("k2", "seven")),
        ("k1", base().kwarg("k1", vec![6]).kwarg("k2", 7)),
    ];
    for (name, call) in cases {
        match func.call(call) {
            Err(error) if error.to_string().contains(name) => {
                println!("❌ {} rejected: {}", name, error);
            }
            other => anyhow::bail!("expected {} to be rejected, got {:?}", name, other),
        }
    }

    Ok(())
}
