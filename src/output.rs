//! Output formatting for diff results.
//!
//! Diffs can be rendered as colored terminal output, plain text, a JSON
//! report, or an RFC 6902 patch document. Paths are shown either as JSON
//! Pointers (`/a/b/0`) or in dotted form (`$.a.b[0]`).
//!
//! # Examples
//!
//! ```
//! use jdelta::{compute_diff, format_diff, DiffConfig, JsonValue, OutputFormat, OutputOptions};
//!
//! let old = JsonValue::from(42i64);
//! let new = JsonValue::from(43i64);
//! let diff = compute_diff(&old, &new, &DiffConfig::default());
//!
//! let output = format_diff(&diff, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert!(output.contains("42"));
//! assert!(output.contains("43"));
//! ```

use crate::diff::{ChangeKind, Diff, DiffEntry, DiffStats};
use crate::error::OutputError;
use crate::pointer::JsonPointer;
use crate::tree::JsonValue;
use colored::*;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON report of entries and statistics
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
    /// RFC 6902 patch document turning the old value into the new one
    Patch,
}

/// How paths are written in text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStyle {
    /// `/a/b/0`
    #[default]
    Pointer,
    /// `$.a.b[0]`
    Dotted,
}

/// Options for controlling output formatting.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Show full values instead of previews for containers
    pub show_values: bool,
    /// Maximum length for displayed values (truncate if longer)
    pub max_value_length: usize,
    /// How paths are written
    pub path_style: PathStyle,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            show_values: false,
            max_value_length: 80,
            path_style: PathStyle::Pointer,
        }
    }
}

/// Formats a diff according to the specified format and options.
pub fn format_diff(
    diff: &Diff,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_text(diff, options, true)),
        OutputFormat::Plain => Ok(format_text(diff, options, false)),
        OutputFormat::Json => format_json(diff, options),
        OutputFormat::Patch => to_pretty_json(&diff.to_patch()),
    }
}

/// Renders a value as pretty-printed JSON.
pub fn format_value(value: &JsonValue) -> Result<String, OutputError> {
    to_pretty_json(value)
}

fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

/// Color scheme: added green, removed red, changed yellow.
fn format_text(diff: &Diff, options: &OutputOptions, use_color: bool) -> String {
    if diff.is_empty() {
        let message = "No changes detected.";
        return if use_color {
            message.dimmed().to_string()
        } else {
            message.to_string()
        };
    }

    let mut output = String::new();
    for entry in &diff.entries {
        let line = if use_color {
            format_entry_terminal(entry, options)
        } else {
            format_entry_plain(entry, options)
        };
        output.push_str(&line);
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format_summary(&diff.stats));
    output
}

fn format_entry_terminal(entry: &DiffEntry, options: &OutputOptions) -> String {
    let path = format_path(&entry.path, options.path_style);
    let old = entry.old_value.as_ref().map(|v| display_value(v, options));
    let new = entry.new_value.as_ref().map(|v| display_value(v, options));

    match entry.kind {
        ChangeKind::Added => format!(
            "{} {}: {}",
            "+".bright_green(),
            path.green(),
            new.unwrap_or_default().green()
        ),
        ChangeKind::Removed => format!(
            "{} {}: {}",
            "-".bright_red(),
            path.red(),
            old.unwrap_or_default().red()
        ),
        ChangeKind::Changed => format!(
            "{} {}: {} {} {}",
            "~".bright_yellow(),
            path.yellow(),
            old.unwrap_or_default().yellow(),
            "→".bright_yellow(),
            new.unwrap_or_default().yellow()
        ),
    }
}

fn format_entry_plain(entry: &DiffEntry, options: &OutputOptions) -> String {
    let path = format_path(&entry.path, options.path_style);
    let old = entry.old_value.as_ref().map(|v| display_value(v, options));
    let new = entry.new_value.as_ref().map(|v| display_value(v, options));

    match entry.kind {
        ChangeKind::Added => format!("+ {}: {}", path, new.unwrap_or_default()),
        ChangeKind::Removed => format!("- {}: {}", path, old.unwrap_or_default()),
        ChangeKind::Changed => format!(
            "~ {}: {} → {}",
            path,
            old.unwrap_or_default(),
            new.unwrap_or_default()
        ),
    }
}

fn format_json(diff: &Diff, options: &OutputOptions) -> Result<String, OutputError> {
    use serde_json::json;

    let entries: Vec<serde_json::Value> = diff
        .entries
        .iter()
        .map(|entry| {
            let path = match options.path_style {
                PathStyle::Pointer => entry.path.encode(),
                PathStyle::Dotted => entry.path.to_dotted(),
            };
            let mut object = json!({
                "path": path,
                "kind": entry.kind,
            });
            if let Some(old) = &entry.old_value {
                object["old_value"] = serde_json::Value::from(old);
            }
            if let Some(new) = &entry.new_value {
                object["new_value"] = serde_json::Value::from(new);
            }
            object
        })
        .collect();

    to_pretty_json(&json!({
        "entries": entries,
        "stats": diff.stats,
    }))
}

/// Writes a path in the requested style. The root pointer is shown as
/// `(root)` in pointer style, since its canonical form is empty.
pub fn format_path(path: &JsonPointer, style: PathStyle) -> String {
    match style {
        PathStyle::Pointer if path.is_root() => "(root)".to_string(),
        PathStyle::Pointer => path.encode(),
        PathStyle::Dotted => path.to_dotted(),
    }
}

fn display_value(value: &JsonValue, options: &OutputOptions) -> String {
    if options.show_values {
        serde_json::to_string(value).unwrap_or_else(|_| value.preview(options.max_value_length))
    } else {
        value.preview(options.max_value_length)
    }
}

fn format_summary(stats: &DiffStats) -> String {
    if stats.is_empty() {
        return "Summary: No changes".to_string();
    }

    let mut parts = Vec::new();
    if stats.added > 0 {
        parts.push(format!("{} added", stats.added));
    }
    if stats.removed > 0 {
        parts.push(format!("{} removed", stats.removed));
    }
    if stats.changed > 0 {
        parts.push(format!("{} changed", stats.changed));
    }

    format!("Summary: {}", parts.join(", "))
}
