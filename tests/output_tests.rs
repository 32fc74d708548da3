use jdelta::diff::{ChangeKind, Diff, DiffEntry};
use jdelta::output::{format_diff, format_path, format_value, OutputFormat, OutputOptions, PathStyle};
use jdelta::{parse_json, JsonPointer, JsonValue};

fn pointer(text: &str) -> JsonPointer {
    text.parse().unwrap()
}

fn age_changed() -> Diff {
    Diff::from_entries(vec![DiffEntry::changed(
        pointer("/user/age"),
        JsonValue::from(30i64),
        JsonValue::from(31i64),
    )])
}

#[test]
fn test_format_plain_no_changes() {
    let output = format_diff(&Diff::new(), &OutputFormat::Plain, &OutputOptions::default()).unwrap();
    assert_eq!(output, "No changes detected.");
}

#[test]
fn test_format_plain_with_changes() {
    let output = format_diff(&age_changed(), &OutputFormat::Plain, &OutputOptions::default()).unwrap();
    assert!(output.starts_with("~ /user/age: 30 → 31\n"));
    assert!(output.ends_with("Summary: 1 changed"));
}

#[test]
fn test_format_plain_dotted_paths() {
    let options = OutputOptions {
        path_style: PathStyle::Dotted,
        ..Default::default()
    };
    let output = format_diff(&age_changed(), &OutputFormat::Plain, &options).unwrap();
    assert!(output.starts_with("~ $.user.age: 30 → 31"));
}

#[test]
fn test_format_plain_root_change() {
    let diff = Diff::from_entries(vec![DiffEntry::changed(
        JsonPointer::root(),
        JsonValue::from("a"),
        JsonValue::Null,
    )]);
    let output = format_diff(&diff, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
    assert!(output.starts_with("~ (root): \"a\" → null"));
}

#[test]
fn test_format_plain_added_and_removed() {
    let diff = Diff::from_entries(vec![
        DiffEntry::removed(pointer("/old"), JsonValue::Bool(true)),
        DiffEntry::added(pointer("/new"), parse_json(r#"{"x": 1}"#).unwrap()),
    ]);
    let output = format_diff(&diff, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "- /old: true");
    assert_eq!(lines[1], "+ /new: { 1 key }");
    assert_eq!(lines.last(), Some(&"Summary: 1 added, 1 removed"));
}

#[test]
fn test_max_value_length_truncates() {
    let diff = Diff::from_entries(vec![DiffEntry::added(
        pointer("/text"),
        JsonValue::from("x".repeat(200)),
    )]);
    let options = OutputOptions {
        max_value_length: 10,
        ..Default::default()
    };
    let output = format_diff(&diff, &OutputFormat::Plain, &options).unwrap();
    assert!(output.starts_with("+ /text: \"xxxxxx...\n"));
}

#[test]
fn test_format_terminal_is_colored() {
    colored::control::set_override(true);
    let output = format_diff(&age_changed(), &OutputFormat::Terminal, &OutputOptions::default()).unwrap();
    assert!(output.contains("\u{1b}["));
    assert!(output.contains("/user/age"));
}

#[test]
fn test_format_json() {
    let output = format_diff(&age_changed(), &OutputFormat::Json, &OutputOptions::default()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["entries"][0]["path"], "/user/age");
    assert_eq!(report["entries"][0]["kind"], "changed");
    assert_eq!(report["entries"][0]["old_value"], 30);
    assert_eq!(report["entries"][0]["new_value"], 31);
    assert_eq!(report["stats"]["added"], 0);
    assert_eq!(report["stats"]["changed"], 1);
}

#[test]
fn test_format_json_omits_absent_values() {
    let diff = Diff::from_entries(vec![DiffEntry::added(pointer("/a"), JsonValue::Null)]);
    let output = format_diff(&diff, &OutputFormat::Json, &OutputOptions::default()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    let entry = report["entries"][0].as_object().unwrap();
    assert_eq!(entry["kind"], "added");
    assert!(entry.contains_key("new_value"));
    assert!(!entry.contains_key("old_value"));
}

#[test]
fn test_format_patch() {
    let output = format_diff(&age_changed(), &OutputFormat::Patch, &OutputOptions::default()).unwrap();
    let ops: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        ops,
        serde_json::json!([{"op": "replace", "path": "/user/age", "value": 31}])
    );
}

#[test]
fn test_format_value_pretty_prints_in_order() {
    let value = parse_json(r#"{"b": [1], "a": 2.5}"#).unwrap();
    assert_eq!(
        format_value(&value).unwrap(),
        "{\n  \"b\": [\n    1\n  ],\n  \"a\": 2.5\n}"
    );
}

#[test]
fn test_format_path() {
    assert_eq!(format_path(&pointer("/a b/0"), PathStyle::Pointer), "/a b/0");
    assert_eq!(format_path(&pointer("/a b/0"), PathStyle::Dotted), r#"$["a b"][0]"#);
    assert_eq!(format_path(&JsonPointer::root(), PathStyle::Pointer), "(root)");
}

#[test]
fn test_change_kind_display_names() {
    assert_eq!(serde_json::to_string(&ChangeKind::Added).unwrap(), r#""added""#);
    assert_eq!(serde_json::to_string(&ChangeKind::Removed).unwrap(), r#""removed""#);
}
