//! Custom error types for jdelta.

use crate::pointer::JsonPointer;
use crate::tree::JsonValue;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not detect file format for {path}")]
    UnknownFormat { path: String },
}

/// Malformed JSON Pointer syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    #[error("pointer {pointer:?} must be empty or start with '/'")]
    MissingLeadingSlash { pointer: String },

    #[error("invalid escape sequence in pointer {pointer:?} at byte {position}")]
    InvalidEscape { pointer: String, position: usize },
}

/// What went wrong while applying a single patch operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchErrorKind {
    #[error(transparent)]
    Pointer(#[from] PointerError),

    #[error("malformed operation: {reason}")]
    Malformed { reason: String },

    #[error("no value at {path}")]
    NotFound { path: JsonPointer },

    #[error("index {index} is out of bounds at {path} (array length {len})")]
    OutOfBounds {
        path: JsonPointer,
        index: usize,
        len: usize,
    },

    #[error("cannot resolve {path}: expected {expected}")]
    TypeMismatch {
        path: JsonPointer,
        expected: &'static str,
    },

    #[error("cannot move {from} into its own child {path}")]
    MoveIntoSelf {
        from: JsonPointer,
        path: JsonPointer,
    },

    #[error("test failed at {path}: expected {}, found {}", .expected.preview(60), .actual.preview(60))]
    TestFailed {
        path: JsonPointer,
        expected: JsonValue,
        actual: JsonValue,
    },
}

/// Failure of an RFC 6902 patch, pinned to the offending operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("operation {op_index}: {kind}")]
pub struct PatchError {
    pub op_index: usize,
    pub kind: PatchErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to serialize to JSON: {source}")]
    JsonSerializationError {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum JdeltaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl ParseError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn json_error(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonError {
            path: path.into(),
            source,
        }
    }

    pub fn yaml_error(path: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::YamlError {
            path: path.into(),
            source,
        }
    }

    pub fn toml_error(path: impl Into<String>, source: toml::de::Error) -> Self {
        Self::TomlError {
            path: path.into(),
            source,
        }
    }

    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::UnknownFormat { path: path.into() }
    }
}

impl PatchError {
    pub fn new(op_index: usize, kind: impl Into<PatchErrorKind>) -> Self {
        Self {
            op_index,
            kind: kind.into(),
        }
    }

    pub fn malformed(op_index: usize, reason: impl Into<String>) -> Self {
        Self::new(
            op_index,
            PatchErrorKind::Malformed {
                reason: reason.into(),
            },
        )
    }
}
