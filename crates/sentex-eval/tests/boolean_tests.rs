use anyhow::{Result, bail};
use pretty_assertions::assert_eq;
use sentex_eval::{FunctionRegistry, Value, evaluate};
use sentex_syntax::{Options, parse};
use serde_json::json;

fn registry() -> Result<FunctionRegistry> {
    Ok(FunctionRegistry::new().register("boom", |_: &[Value]| bail!("boom was called"))?)
}

fn eval(source: &str) -> Result<Value> {
    let options = Options::default();
    let expr = parse(source, &options)?;
    let ctx = json!({
        "yes": true,
        "no": false,
        "zero": 0,
        "empty": "",
        "name": "Ada",
        "list": [],
        "nothing": null,
    });
    Ok(evaluate(&expr, source, &ctx, &options, &registry()?)?)
}

#[test]
fn test_truthiness() -> Result<()> {
    for falsy in ["no", "zero", "empty", "nothing", "missing", "0 / 1 - 0", "-0"] {
        assert_eq!(eval(&format!("!({falsy})"))?, Value::Bool(true), "{falsy}");
    }
    for truthy in ["yes", "name", "list", "{}", "'0'", "-1"] {
        assert_eq!(eval(&format!("!({truthy})"))?, Value::Bool(false), "{truthy}");
    }
    Ok(())
}

#[test]
fn test_logical_operators_return_deciding_operand() -> Result<()> {
    assert_eq!(eval("name && zero")?, Value::from(0));
    assert_eq!(eval("empty && name")?, Value::from(""));
    assert_eq!(eval("empty || name")?, Value::from("Ada"));
    assert_eq!(eval("name || boom()")?, Value::from("Ada"));
    assert_eq!(eval("nothing || missing")?, Value::Undefined);
    assert_eq!(eval("yes && no || 'fallback'")?, Value::from("fallback"));
    Ok(())
}

#[test]
fn test_short_circuit_skips_right_operand() -> Result<()> {
    assert_eq!(eval("no && boom()")?, Value::Bool(false));
    assert_eq!(eval("yes || boom()")?, Value::Bool(true));
    assert_eq!(eval("name ?? boom()")?, Value::from("Ada"));
    assert_eq!(eval("yes ? 1 : boom()")?, Value::from(1));
    assert_eq!(eval("no ? boom() : 2")?, Value::from(2));

    let err = eval("yes && boom()").unwrap_err();
    assert!(err.to_string().contains("function 'boom' failed"), "{err}");
    Ok(())
}

#[test]
fn test_nullish_only_skips_null_and_undefined() -> Result<()> {
    assert_eq!(eval("zero ?? 5")?, Value::from(0));
    assert_eq!(eval("no ?? 5")?, Value::Bool(false));
    assert_eq!(eval("empty ?? 5")?, Value::from(""));
    assert_eq!(eval("nothing ?? missing ?? 5")?, Value::from(5));
    Ok(())
}

#[test]
fn test_equality_has_no_coercion() -> Result<()> {
    assert_eq!(eval("1 == '1'")?, Value::Bool(false));
    assert_eq!(eval("0 == false")?, Value::Bool(false));
    assert_eq!(eval("null == undefined")?, Value::Bool(true));
    assert_eq!(eval("nothing == missing")?, Value::Bool(true));
    assert_eq!(eval("[1, [2]] == [1, [2]]")?, Value::Bool(true));
    assert_eq!(eval("{a: 1} != {a: 2}")?, Value::Bool(true));
    assert_eq!(eval("name == 'Ada'")?, Value::Bool(true));
    Ok(())
}

#[test]
fn test_relational_operators() -> Result<()> {
    assert_eq!(eval("'apple' < 'banana'")?, Value::Bool(true));
    assert_eq!(eval("'10' < '9'")?, Value::Bool(true));
    assert_eq!(eval("'10' < 9")?, Value::Bool(false));
    assert_eq!(eval("yes > no")?, Value::Bool(true));
    assert_eq!(eval("2 >= 2 && 2 <= 2")?, Value::Bool(true));
    assert!(eval("missing < 1").is_err());
    Ok(())
}
