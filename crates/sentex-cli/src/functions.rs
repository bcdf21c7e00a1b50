//! Host functions available to expressions run from the command line.

use anyhow::{Result, bail};
use sentex::{Diagnostic, FunctionRegistry, Value};

/// Name and one-line usage of every function in [`registry`].
pub const FUNCTIONS: [(&str, &str); 4] = [
    ("len", "len(x): characters of a string, items of an array, keys of an object"),
    ("upper", "upper(s): upper-cased copy of a string"),
    ("concat", "concat(a, b, ...): joins the display form of every argument"),
    ("clamp", "clamp(x, lo, hi): x limited to [lo, hi]; fails when lo > hi"),
];

pub fn registry() -> Result<FunctionRegistry, Diagnostic> {
    FunctionRegistry::new()
        .register("len", len)?
        .register("upper", upper)?
        .register("concat", concat)?
        .register("clamp", clamp)
}

fn len(args: &[Value]) -> Result<Value> {
    match args {
        [Value::String(s)] => Ok(Value::from(s.chars().count())),
        [Value::Array(items)] => Ok(Value::from(items.len())),
        [Value::Object(map)] => Ok(Value::from(map.len())),
        [other] => bail!("expected a string, array or object, got {}", other.describe()),
        _ => bail!("expected 1 argument, got {}", args.len()),
    }
}

fn upper(args: &[Value]) -> Result<Value> {
    match args {
        [Value::String(s)] => Ok(Value::from(s.to_uppercase())),
        [other] => bail!("expected a string, got {}", other.describe()),
        _ => bail!("expected 1 argument, got {}", args.len()),
    }
}

fn concat(args: &[Value]) -> Result<Value> {
    Ok(Value::from(args.iter().map(Value::to_string).collect::<String>()))
}

fn clamp(args: &[Value]) -> Result<Value> {
    let [x, lo, hi] = args else {
        bail!("expected 3 arguments, got {}", args.len());
    };
    let bound = |v: &Value| v.as_f64().filter(|n| !n.is_nan());
    let (Some(x), Some(lo), Some(hi)) = (x.as_f64(), bound(lo), bound(hi)) else {
        bail!("expected a number and two numeric bounds");
    };
    if lo > hi {
        return Err(Diagnostic::runtime(format!(
            "clamp: lower bound {lo} is greater than upper bound {hi}"
        ))
        .into());
    }
    Ok(Value::Number(x.clamp(lo, hi)))
}
