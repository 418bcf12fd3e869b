// src/main.rs
//! Aspect Engine demo runner
//!
//! Builds a small `Echo` type, layers before/after/around aspects on it and
//! logs what each call returns.

use anyhow::Result;
use aspect_engine::observability::{init_metrics, init_tracing};
use aspect_engine::{AspectEngine, EngineConfig, Payload, TypeBuilder, TypeRef, Value};
use serde_json::json;
use tracing::info;

fn main() -> Result<()> {
    let config = EngineConfig::load(std::env::args().nth(1).as_deref())?;

    init_tracing(&config.logging)?;
    let metrics = init_metrics()?;

    info!("Starting Aspect Engine demo v{}", aspect_engine::VERSION);

    let engine = AspectEngine::new(config);
    let echo = echo_type();
    let instance = echo.construct(vec![])?;

    engine.before(&instance, increment_first_argument, &[])?;
    let result = instance.call("dynamicMethod", vec![json!(1), json!(2)])?;
    info!("before:  dynamicMethod(1, 2) = {}", result);

    engine.after(&echo, decrement_a, &["staticMethod"])?;
    let result = echo.call_static("staticMethod", vec![json!(1), json!(2)])?;
    info!("after:   staticMethod(1, 2) = {}", result);

    engine.around(&echo, log_both_phases, &["dynamicMethod"])?;
    let result = instance.call("dynamicMethod", vec![json!(1), json!(2)])?;
    info!("around:  dynamicMethod(1, 2) = {}", result);

    info!("Metrics:\n{}", metrics.render());
    Ok(())
}

fn echo_type() -> TypeRef {
    fn echo(args: Vec<Value>) -> Value {
        let mut args = args.into_iter();
        let a = args.next().unwrap_or(Value::Null);
        json!({ "a": a, "rest": args.collect::<Vec<_>>() })
    }

    TypeBuilder::new("Echo")
        .method("dynamicMethod", |_, args| Ok(echo(args)))
        .static_method("staticMethod", |_, args| Ok(echo(args)))
        .build()
}

fn increment_first_argument(
    _label: &str,
    mut payload: Payload<'_>,
) -> aspect_engine::Result<Value> {
    if let Some(first) = payload.arguments_mut().and_then(|args| args.first_mut()) {
        *first = json!(first.as_i64().unwrap_or(0) + 1);
    }
    Ok(Value::Null)
}

fn decrement_a(_label: &str, payload: Payload<'_>) -> aspect_engine::Result<Value> {
    let mut value = payload.into_return_value().unwrap_or(Value::Null);
    if let Some(a) = value.get("a").and_then(Value::as_i64) {
        value["a"] = json!(a - 1);
    }
    Ok(value)
}

fn log_both_phases(label: &str, payload: Payload<'_>) -> aspect_engine::Result<Value> {
    match payload {
        Payload::Arguments(args) => {
            info!("{} args={:?}", label, args);
            Ok(Value::Null)
        }
        Payload::ReturnValue(value) => {
            info!("{} result={}", label, value);
            Ok(value)
        }
    }
}
