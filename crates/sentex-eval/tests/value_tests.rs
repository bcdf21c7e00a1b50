use anyhow::Result;
use pretty_assertions::assert_eq;
use sentex_eval::{Gettable, PropertyKey, Value};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

#[test]
fn test_json_round_trip_keeps_integers() {
    let json = json!({"n": 3, "f": 1.5, "s": "x", "b": true, "z": null, "a": [1, 2]});
    let value = Value::from(&json);
    assert_eq!(value.as_object().map(BTreeMap::len), Some(6));
    assert_eq!(serde_json::Value::from(&value), json);
}

#[test]
fn test_object_keys_come_back_sorted() -> Result<()> {
    let options = sentex_syntax::Options::default();
    let source = "{b: 1, a: 2, 10: 3, 9: 4}";
    let expr = sentex_syntax::parse(source, &options)?;
    let value = sentex_eval::evaluate(
        &expr,
        source,
        &json!({}),
        &options,
        &sentex_eval::FunctionRegistry::new(),
    )?;
    let keys: Vec<&str> = value
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(keys, vec!["10", "9", "a", "b"]);
    assert_eq!(serde_json::to_string(&value)?, r#"{"10":3,"9":4,"a":2,"b":1}"#);
    Ok(())
}

#[test]
fn test_json_output_drops_undefined_members() {
    let value = Value::from(BTreeMap::from([
        ("kept".to_string(), Value::from(1)),
        ("gone".to_string(), Value::Undefined),
    ]));
    assert_eq!(serde_json::Value::from(&value), json!({"kept": 1}));
    assert_eq!(
        serde_json::Value::from(Value::Array(vec![Value::Undefined, Value::Number(f64::NAN)])),
        json!([null, null])
    );
}

#[test]
fn test_display() {
    assert_eq!(Value::from(3).to_string(), "3");
    assert_eq!(Value::from(0.25).to_string(), "0.25");
    assert_eq!(Value::from("raw").to_string(), "raw");
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(
        Value::from(vec![Value::from("a"), Value::Null]).to_string(),
        r#"["a",null]"#
    );
}

#[test]
fn test_serialize_matches_json_conversion() -> Result<()> {
    let value = Value::from(&json!({"list": [1, 2.5, "x"], "flag": false}));
    assert_eq!(serde_json::to_value(&value)?, serde_json::Value::from(&value));
    Ok(())
}

#[test]
fn test_gettable_contexts_agree() {
    let json = json!({"user": {"name": "Ada"}, "tags": ["x"]});
    let value = Value::from(&json);
    let hash: HashMap<String, Value> = value
        .as_object()
        .map(|m| m.clone().into_iter().collect())
        .unwrap_or_default();

    let key = PropertyKey::name("user");
    let expected = Some(Value::from(&json!({"name": "Ada"})));
    assert_eq!(Gettable::get(&json, &key), expected);
    assert_eq!(Gettable::get(&value, &key), expected);
    assert_eq!(Gettable::get(&hash, &key), expected);
    assert_eq!(Gettable::get(&json, &PropertyKey::name("absent")), None);
}

#[test]
fn test_sequences_expose_length_and_indices() {
    let list = Value::from(&json!(["a", "b"]));
    assert_eq!(list.get(&PropertyKey::name("length")), Some(Value::from(2)));
    assert_eq!(list.get(&PropertyKey::Index(1)), Some(Value::from("b")));
    assert_eq!(list.get(&PropertyKey::name("01")), None);

    let text = Value::from("héllo");
    assert_eq!(text.get(&PropertyKey::name("length")), Some(Value::from(5)));
    assert_eq!(text.get(&PropertyKey::Index(1)), Some(Value::from("é")));
    assert_eq!(Value::from(1).get(&PropertyKey::name("length")), None);
}
