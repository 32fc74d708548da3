//! Parsing of JSON, YAML and TOML documents into [`JsonValue`]s.
//!
//! Formats are detected by file extension. Files with an unknown or missing
//! extension are tried as JSON, then TOML, then YAML. YAML goes last since
//! it reads almost any text as a plain string. Object key order is preserved
//! in every format.
//!
//! # Examples
//!
//! ```no_run
//! use jdelta::parser::parse_file;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = parse_file(Path::new("data.json"))?;
//! let patch = parse_file(Path::new("patch.yaml"))?;
//! # Ok(())
//! # }
//! ```

use crate::error::ParseError;
use crate::tree::JsonValue;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Which format to read content as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatHint {
    Json,
    Yaml,
    Toml,
    /// Try JSON, then TOML, then YAML
    #[default]
    Auto,
}

impl FormatHint {
    /// Picks a format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("json") => FormatHint::Json,
            Some("yaml") | Some("yml") => FormatHint::Yaml,
            Some("toml") => FormatHint::Toml,
            _ => FormatHint::Auto,
        }
    }
}

/// Parses a file into a value.
///
/// # Errors
///
/// This function will return an error if:
/// - The file does not exist (`ParseError::FileNotFound`)
/// - The file cannot be read (`ParseError::ReadError`)
/// - The file is not valid for its format (`JsonError`, `YamlError`, `TomlError`)
/// - The extension is unknown and no format accepts the content
///   (`ParseError::UnknownFormat`)
pub fn parse_file(path: &Path) -> Result<JsonValue, ParseError> {
    let name = path.to_string_lossy().to_string();
    if !path.exists() {
        return Err(ParseError::file_not_found(name));
    }

    let content = fs::read_to_string(path).map_err(|e| ParseError::read_error(&name, e))?;
    let hint = FormatHint::from_path(path);
    tracing::debug!(path = %name, format = ?hint, "parsing file");

    parse_content(&content, hint, &name)
}

/// Reads all of stdin and parses it.
pub fn parse_stdin(hint: FormatHint) -> Result<JsonValue, ParseError> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .map_err(|e| ParseError::read_error("<stdin>", e))?;
    tracing::debug!(bytes = content.len(), format = ?hint, "parsing stdin");

    parse_content(&content, hint, "<stdin>")
}

/// Parses text in the given format. `source` names the input in errors.
pub fn parse_content(content: &str, hint: FormatHint, source: &str) -> Result<JsonValue, ParseError> {
    match hint {
        FormatHint::Json => parse_json(content).map_err(|e| ParseError::json_error(source, e)),
        FormatHint::Yaml => parse_yaml(content).map_err(|e| ParseError::yaml_error(source, e)),
        FormatHint::Toml => parse_toml(content).map_err(|e| ParseError::toml_error(source, e)),
        FormatHint::Auto => parse_json(content)
            .ok()
            .or_else(|| parse_toml(content).ok())
            .or_else(|| parse_yaml(content).ok())
            .ok_or_else(|| ParseError::unknown_format(source)),
    }
}

/// Parses a JSON string.
///
/// # Examples
///
/// ```
/// use jdelta::parser::parse_json;
///
/// let value = parse_json(r#"{"name": "Alice", "age": 30}"#).unwrap();
/// assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Alice"));
/// ```
pub fn parse_json(content: &str) -> Result<JsonValue, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(JsonValue::from(value))
}

/// Parses a YAML string.
pub fn parse_yaml(content: &str) -> Result<JsonValue, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(JsonValue::from(value))
}

/// Parses a TOML document. The top level is always a table.
pub fn parse_toml(content: &str) -> Result<JsonValue, toml::de::Error> {
    let table: toml::Table = toml::from_str(content)?;
    Ok(JsonValue::from(toml::Value::Table(table)))
}
