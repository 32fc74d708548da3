use jdelta::parser::{parse_content, parse_file, parse_json, parse_toml, parse_yaml, FormatHint};
use jdelta::{JsonValue, ParseError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_parse_json_primitives() {
    assert_eq!(parse_json("null").unwrap(), JsonValue::Null);
    assert_eq!(parse_json("true").unwrap(), JsonValue::Bool(true));
    assert_eq!(parse_json("-7").unwrap(), JsonValue::from(-7i64));
    assert_eq!(parse_json("1e2").unwrap(), JsonValue::from(100.0));
    assert_eq!(parse_json(r#""aé""#).unwrap(), JsonValue::from("aé"));
}

#[test]
fn test_parse_json_nested() {
    let value = parse_json(r#"{"user": {"tags": ["a", {"b": null}]}}"#).unwrap();
    let tags = value
        .get("user")
        .and_then(|user| user.get("tags"))
        .and_then(|tags| tags.as_array())
        .unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[1].get("b"), Some(&JsonValue::Null));
}

#[test]
fn test_parse_json_invalid() {
    assert!(parse_json("{invalid json}").is_err());
    assert!(parse_json("[1, 2,").is_err());
    assert!(parse_json("").is_err());
}

#[test]
fn test_parse_yaml_object() {
    let value = parse_yaml("name: Alice\nage: 30\ntags:\n  - a\n  - b\n").unwrap();
    assert_eq!(
        value,
        parse_json(r#"{"name": "Alice", "age": 30, "tags": ["a", "b"]}"#).unwrap()
    );
}

#[test]
fn test_parse_yaml_invalid() {
    assert!(parse_yaml("key: value: invalid").is_err());
    assert!(parse_yaml("[1, 2,").is_err());
}

#[test]
fn test_yaml_non_string_keys() {
    let value = parse_yaml("1: first\n2: second\ntrue: yes").unwrap();
    let map = value.as_object().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("1"), Some(&JsonValue::from("first")));
    assert_eq!(map.get("2"), Some(&JsonValue::from("second")));
    assert_eq!(map.get("true"), Some(&JsonValue::from("yes")));
}

#[test]
fn test_yaml_key_order_is_kept() {
    let value = parse_yaml("zeta: 1\nalpha: 2\n").unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["zeta", "alpha"]);
}

#[test]
fn test_parse_toml_tables_and_arrays() {
    let value = parse_toml(
        "name = \"pkg\"\n\n[deps]\nserde = \"1\"\n\n[[bin]]\nname = \"a\"\n\n[[bin]]\nname = \"b\"\n",
    )
    .unwrap();
    assert_eq!(
        value,
        parse_json(
            r#"{"name": "pkg", "deps": {"serde": "1"}, "bin": [{"name": "a"}, {"name": "b"}]}"#
        )
        .unwrap()
    );
}

#[test]
fn test_toml_datetime_becomes_string() {
    let value = parse_toml("when = 1979-05-27T07:32:00Z\n").unwrap();
    assert_eq!(value.get("when"), Some(&JsonValue::from("1979-05-27T07:32:00Z")));
}

#[test]
fn test_format_hint_from_path() {
    assert_eq!(FormatHint::from_path(Path::new("a.json")), FormatHint::Json);
    assert_eq!(FormatHint::from_path(Path::new("a.YML")), FormatHint::Yaml);
    assert_eq!(FormatHint::from_path(Path::new("a.yaml")), FormatHint::Yaml);
    assert_eq!(FormatHint::from_path(Path::new("Cargo.toml")), FormatHint::Toml);
    assert_eq!(FormatHint::from_path(Path::new("README")), FormatHint::Auto);
}

#[test]
fn test_parse_content_auto_detection() {
    let json = parse_content(r#"{"a": 1}"#, FormatHint::Auto, "x").unwrap();
    let toml = parse_content("a = 1\n[b]\nc = 2\n", FormatHint::Auto, "x").unwrap();
    let yaml = parse_content("a: 1\nb:\n  c: 2\n", FormatHint::Auto, "x").unwrap();

    assert_eq!(json, parse_json(r#"{"a": 1}"#).unwrap());
    assert_eq!(toml, parse_json(r#"{"a": 1, "b": {"c": 2}}"#).unwrap());
    assert_eq!(yaml, toml);
}

#[test]
fn test_parse_content_explicit_format_errors() {
    let err = parse_content("a: [", FormatHint::Yaml, "inline.yaml").unwrap_err();
    assert!(matches!(err, ParseError::YamlError { .. }));
    assert!(err.to_string().contains("inline.yaml"));

    let err = parse_content("a = ", FormatHint::Toml, "inline.toml").unwrap_err();
    assert!(matches!(err, ParseError::TomlError { .. }));
}

#[test]
fn test_parse_file_json() {
    let file = temp_file(".json", r#"{"key": "value"}"#);
    let value = parse_file(file.path()).unwrap();
    assert_eq!(value.get("key"), Some(&JsonValue::from("value")));
}

#[test]
fn test_parse_file_yaml() {
    let file = temp_file(".yaml", "key: value\n");
    let value = parse_file(file.path()).unwrap();
    assert_eq!(value.get("key"), Some(&JsonValue::from("value")));
}

#[test]
fn test_parse_file_toml() {
    let file = temp_file(".toml", "key = \"value\"\n");
    let value = parse_file(file.path()).unwrap();
    assert_eq!(value.get("key"), Some(&JsonValue::from("value")));
}

#[test]
fn test_parse_file_unknown_extension() {
    let file = temp_file(".txt", r#"{"key": "value"}"#);
    let value = parse_file(file.path()).unwrap();
    assert_eq!(value.get("key"), Some(&JsonValue::from("value")));
}

#[test]
fn test_parse_file_extension_is_binding() {
    let file = temp_file(".json", "key: value\n");
    let err = parse_file(file.path()).unwrap_err();
    assert!(matches!(err, ParseError::JsonError { .. }));
}

#[test]
fn test_parse_file_not_found() {
    let err = parse_file(Path::new("/nonexistent/file.json")).unwrap_err();
    assert!(matches!(err, ParseError::FileNotFound { .. }));
}
