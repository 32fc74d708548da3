use jdelta::{parse_json, parse_toml, JsonValue, Map, Number};

fn object(pairs: &[(&str, JsonValue)]) -> JsonValue {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert(key.to_string(), value.clone());
    }
    JsonValue::Object(map)
}

fn numbers(items: &[f64]) -> JsonValue {
    JsonValue::Array(items.iter().copied().map(JsonValue::from).collect())
}

#[test]
fn test_type_name() {
    assert_eq!(JsonValue::Null.type_name(), "null");
    assert_eq!(JsonValue::Bool(true).type_name(), "boolean");
    assert_eq!(JsonValue::from(42i64).type_name(), "number");
    assert_eq!(JsonValue::from("test").type_name(), "string");
    assert_eq!(JsonValue::Object(Map::new()).type_name(), "object");
    assert_eq!(JsonValue::Array(vec![]).type_name(), "array");
}

#[test]
fn test_equality_primitives() {
    assert_eq!(JsonValue::Null, JsonValue::Null);
    assert_eq!(JsonValue::Bool(false), JsonValue::Bool(false));
    assert_ne!(JsonValue::Bool(true), JsonValue::Bool(false));
    assert_eq!(JsonValue::from("hello"), JsonValue::from("hello"));
    assert_ne!(JsonValue::from("hello"), JsonValue::from("world"));

    assert_ne!(JsonValue::Null, JsonValue::Bool(false));
    assert_ne!(JsonValue::Bool(true), JsonValue::from(1i64));
    assert_ne!(JsonValue::from("1"), JsonValue::from(1i64));
}

#[test]
fn test_equality_numbers_is_exact() {
    assert_eq!(JsonValue::from(42i64), JsonValue::from(42.0));
    assert_eq!(parse_json("1").unwrap(), parse_json("1.0").unwrap());
    assert_ne!(JsonValue::from(1.0), JsonValue::from(1.0 + 1e-12));
}

#[test]
fn test_large_integers_keep_their_value() {
    let value = parse_json(r#"{"id": 9007199254740993, "max": 18446744073709551615}"#).unwrap();
    assert_eq!(
        value.get("id"),
        Some(&JsonValue::Number(Number::Int(9_007_199_254_740_993)))
    );
    assert_eq!(
        value.get("max"),
        Some(&JsonValue::Number(Number::UInt(u64::MAX)))
    );
    assert_ne!(
        parse_json("9007199254740993").unwrap(),
        parse_json("9007199254740992").unwrap()
    );
    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        r#"{"id":9007199254740993,"max":18446744073709551615}"#
    );
}

#[test]
fn test_toml_nan_equals_itself() {
    let value = parse_toml("x = nan\n").unwrap();
    assert!(matches!(value.get("x"), Some(JsonValue::Number(Number::Float(f))) if f.is_nan()));
    assert_eq!(value, value.clone());
}

#[test]
fn test_equality_objects() {
    let base = object(&[("a", 1.0.into()), ("b", 2.0.into())]);

    assert_eq!(base, object(&[("b", 2.0.into()), ("a", 1.0.into())]));
    assert_ne!(base, object(&[("a", 1.0.into()), ("b", 3.0.into())]));
    assert_ne!(base, object(&[("a", 1.0.into()), ("c", 2.0.into())]));
    assert_ne!(base, object(&[("a", 1.0.into())]));
    assert_ne!(object(&[("a", JsonValue::Null)]), object(&[]));
}

#[test]
fn test_equality_arrays() {
    let a = numbers(&[1.0, 2.0, 3.0]);
    assert_eq!(a, numbers(&[1.0, 2.0, 3.0]));
    assert_ne!(a, numbers(&[3.0, 2.0, 1.0]));
    assert_ne!(a, numbers(&[1.0, 2.0]));
}

#[test]
fn test_equality_nested() {
    let a = parse_json(r#"{"x": [{"k": 1, "j": [null]}], "y": {}}"#).unwrap();
    let b = parse_json(r#"{"y": {}, "x": [{"j": [null], "k": 1}]}"#).unwrap();
    let c = parse_json(r#"{"y": {}, "x": [{"j": [false], "k": 1}]}"#).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_insertion_order_is_kept() {
    let value = parse_json(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

#[test]
fn test_accessors() {
    let value = parse_json(r#"{"name": "x", "list": [1]}"#).unwrap();
    assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("x"));
    assert_eq!(value.get("list").and_then(|v| v.as_array()).map(Vec::len), Some(1));
    assert!(value.get("missing").is_none());
    assert!(JsonValue::Null.get("name").is_none());
    assert!(value.is_object());
    assert!(!value.is_array());
}

#[test]
fn test_preview() {
    assert_eq!(JsonValue::Null.preview(80), "null");
    assert_eq!(JsonValue::from(3i64).preview(80), "3");
    assert_eq!(JsonValue::from(-0.5).preview(80), "-0.5");
    assert_eq!(JsonValue::from("hi").preview(80), "\"hi\"");
    assert_eq!(JsonValue::Array(vec![]).preview(80), "[]");
    assert_eq!(JsonValue::from(vec![JsonValue::Null]).preview(80), "[ 1 item ]");
    assert_eq!(
        object(&[("a", 1.0.into()), ("b", 2.0.into())]).preview(80),
        "{ 2 keys }"
    );
}

#[test]
fn test_preview_truncates_on_char_boundaries() {
    let value = JsonValue::from("ééééééééééé");
    let preview = value.preview(8);
    assert_eq!(preview.chars().count(), 8);
    assert!(preview.ends_with("..."));
}

#[test]
fn test_serialize_round_trip_keeps_order_and_integers() {
    let text = r#"{"b":1,"a":[1.5,true,null,"s"],"c":{}}"#;
    let value = parse_json(text).unwrap();
    assert_eq!(serde_json::to_string(&value).unwrap(), text);
}

#[test]
fn test_deserialize() {
    let value: JsonValue = serde_json::from_str(r#"{"a": [1, 2]}"#).unwrap();
    assert_eq!(value, object(&[("a", numbers(&[1.0, 2.0]))]));
}
