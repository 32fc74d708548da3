//! jdelta - structural diff and patching for JSON-shaped data.
//!
//! This library compares two JSON values structurally, applies RFC 6902 JSON
//! Patch documents atomically, and applies RFC 7396 JSON Merge Patches. YAML
//! and TOML input is read into the same value model.
//!
//! # Example
//!
//! ```
//! use jdelta::{apply_merge_patch, apply_patch, compute_diff, parse_json, DiffConfig};
//!
//! let old = parse_json(r#"{"name": "Alice", "tags": ["a", "b"]}"#).unwrap();
//! let new = parse_json(r#"{"name": "Alicia", "tags": ["a"]}"#).unwrap();
//!
//! // What changed
//! let diff = compute_diff(&old, &new, &DiffConfig::default());
//! assert_eq!(diff.stats.changed, 1);
//! assert_eq!(diff.stats.removed, 1);
//!
//! // The same change as a JSON Patch
//! let patched = apply_patch(&old, &diff.to_patch()).unwrap();
//! assert_eq!(patched, new);
//!
//! // And as a merge patch
//! let merge = parse_json(r#"{"name": "Alicia", "tags": ["a"]}"#).unwrap();
//! assert_eq!(apply_merge_patch(&old, &merge), new);
//! ```

pub mod diff;
pub mod error;
pub mod filter;
pub mod merge;
pub mod output;
pub mod parser;
pub mod patch;
pub mod pointer;
pub mod tree;

// Re-export commonly used types for convenience
pub use diff::{compute_diff, ChangeKind, Diff, DiffConfig, DiffEntry, DiffStats};
pub use error::{JdeltaError, OutputError, ParseError, PatchError, PatchErrorKind, PointerError};
pub use filter::{filter_diff, FilterConfig, PathPattern};
pub use merge::apply_merge_patch;
pub use output::{format_diff, format_value, OutputFormat, OutputOptions, PathStyle};
pub use parser::{
    parse_content, parse_file, parse_json, parse_stdin, parse_toml, parse_yaml, FormatHint,
};
pub use patch::{apply_patch, apply_patch_document, parse_patch, PatchOperation};
pub use pointer::{JsonPointer, PathToken};
pub use tree::{JsonValue, Map, Number};
