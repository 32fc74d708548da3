//! JSON Patch (RFC 6902).
//!
//! A patch is an ordered list of [`PatchOperation`]s. [`apply_patch`] is
//! atomic: every operation is validated before anything runs, the operations
//! then run in order against a working copy, and the first failure discards
//! that copy. Callers never observe a partially patched document.
//!
//! # Examples
//!
//! ```
//! use jdelta::{apply_patch_document, parse_json};
//!
//! let doc = parse_json(r#"{"foo": ["bar", "baz"]}"#).unwrap();
//! let patch = parse_json(r#"[{"op": "move", "from": "/foo/0", "path": "/foo/1"}]"#).unwrap();
//!
//! let patched = apply_patch_document(&doc, &patch).unwrap();
//! assert_eq!(patched, parse_json(r#"{"foo": ["baz", "bar"]}"#).unwrap());
//! ```

use crate::error::{PatchError, PatchErrorKind};
use crate::pointer::{JsonPointer, PathToken};
use crate::tree::{JsonValue, Map};
use serde::{Serialize, Serializer};

/// A single RFC 6902 operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOperation {
    Add { path: JsonPointer, value: JsonValue },
    Remove { path: JsonPointer },
    Replace { path: JsonPointer, value: JsonValue },
    Move { from: JsonPointer, path: JsonPointer },
    Copy { from: JsonPointer, path: JsonPointer },
    Test { path: JsonPointer, value: JsonValue },
}

impl PatchOperation {
    /// The `op` member naming this operation.
    pub fn op_name(&self) -> &'static str {
        match self {
            PatchOperation::Add { .. } => "add",
            PatchOperation::Remove { .. } => "remove",
            PatchOperation::Replace { .. } => "replace",
            PatchOperation::Move { .. } => "move",
            PatchOperation::Copy { .. } => "copy",
            PatchOperation::Test { .. } => "test",
        }
    }

    /// The target location of the operation.
    pub fn path(&self) -> &JsonPointer {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }

    /// The source location of a move or copy.
    pub fn from_path(&self) -> Option<&JsonPointer> {
        match self {
            PatchOperation::Move { from, .. } | PatchOperation::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Reads one entry of a patch document.
    ///
    /// The entry must be an object with an `op` member, a string `path`, a
    /// string `from` for move and copy, and a `value` member (which may be
    /// `null`) for add, replace and test.
    pub fn from_value(op_index: usize, entry: &JsonValue) -> Result<Self, PatchError> {
        let Some(members) = entry.as_object() else {
            return Err(PatchError::malformed(
                op_index,
                format!("expected an object, found {}", entry.type_name()),
            ));
        };

        let op = match members.get("op") {
            Some(JsonValue::String(op)) => op.as_str(),
            Some(_) => return Err(PatchError::malformed(op_index, "\"op\" must be a string")),
            None => return Err(PatchError::malformed(op_index, "missing \"op\"")),
        };

        let pointer = |name: &str| -> Result<JsonPointer, PatchError> {
            match members.get(name) {
                Some(JsonValue::String(text)) => {
                    JsonPointer::parse(text).map_err(|e| PatchError::new(op_index, e))
                }
                Some(_) => Err(PatchError::malformed(
                    op_index,
                    format!("{:?} must be a string", name),
                )),
                None => Err(PatchError::malformed(
                    op_index,
                    format!("{} is missing {:?}", op, name),
                )),
            }
        };
        let value = || -> Result<JsonValue, PatchError> {
            members
                .get("value")
                .cloned()
                .ok_or_else(|| PatchError::malformed(op_index, format!("{} is missing \"value\"", op)))
        };

        match op {
            "add" => Ok(PatchOperation::Add {
                path: pointer("path")?,
                value: value()?,
            }),
            "remove" => Ok(PatchOperation::Remove {
                path: pointer("path")?,
            }),
            "replace" => Ok(PatchOperation::Replace {
                path: pointer("path")?,
                value: value()?,
            }),
            "move" => Ok(PatchOperation::Move {
                from: pointer("from")?,
                path: pointer("path")?,
            }),
            "copy" => Ok(PatchOperation::Copy {
                from: pointer("from")?,
                path: pointer("path")?,
            }),
            "test" => Ok(PatchOperation::Test {
                path: pointer("path")?,
                value: value()?,
            }),
            other => Err(PatchError::malformed(
                op_index,
                format!("unknown op {:?}", other),
            )),
        }
    }

    /// Renders the operation as a patch document entry.
    pub fn to_value(&self) -> JsonValue {
        let mut members = Map::new();
        members.insert("op".to_string(), JsonValue::from(self.op_name()));
        members.insert("path".to_string(), JsonValue::from(self.path().encode()));
        if let Some(from) = self.from_path() {
            members.insert("from".to_string(), JsonValue::from(from.encode()));
        }
        match self {
            PatchOperation::Add { value, .. }
            | PatchOperation::Replace { value, .. }
            | PatchOperation::Test { value, .. } => {
                members.insert("value".to_string(), value.clone());
            }
            _ => {}
        }
        JsonValue::Object(members)
    }
}

impl Serialize for PatchOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Reads a patch document into operations.
///
/// The whole document is read before any operation could run; the first
/// invalid entry is reported with its index.
pub fn parse_patch(document: &JsonValue) -> Result<Vec<PatchOperation>, PatchError> {
    let Some(entries) = document.as_array() else {
        return Err(PatchError::malformed(
            0,
            format!(
                "a patch must be an array of operations, found {}",
                document.type_name()
            ),
        ));
    };

    entries
        .iter()
        .enumerate()
        .map(|(op_index, entry)| PatchOperation::from_value(op_index, entry))
        .collect()
}

/// Checks the placement rules that the operation type alone cannot express.
///
/// `-` may only end the destination of an add, copy or move. The document
/// root cannot be removed.
pub fn validate(ops: &[PatchOperation]) -> Result<(), PatchError> {
    for (op_index, op) in ops.iter().enumerate() {
        let append_allowed = matches!(
            op,
            PatchOperation::Add { .. } | PatchOperation::Copy { .. } | PatchOperation::Move { .. }
        );
        check_append(op_index, op.op_name(), "path", op.path(), append_allowed)?;
        if let Some(from) = op.from_path() {
            check_append(op_index, op.op_name(), "from", from, false)?;
        }
        if let PatchOperation::Remove { path } = op {
            if path.is_root() {
                return Err(PatchError::malformed(
                    op_index,
                    "cannot remove the document root",
                ));
            }
        }
    }
    Ok(())
}

fn check_append(
    op_index: usize,
    op: &str,
    member: &str,
    pointer: &JsonPointer,
    final_allowed: bool,
) -> Result<(), PatchError> {
    let tokens = pointer.tokens();
    for (position, token) in tokens.iter().enumerate() {
        if !token.is_append() {
            continue;
        }
        let is_final = position + 1 == tokens.len();
        if !(is_final && final_allowed) {
            return Err(PatchError::malformed(
                op_index,
                format!("\"-\" is not allowed in the {} of {} ({})", member, op, pointer),
            ));
        }
    }
    Ok(())
}

/// Applies operations to a document, all or nothing.
///
/// Returns the patched document, or the error of the first operation that
/// failed. `document` itself is never modified.
pub fn apply_patch(document: &JsonValue, ops: &[PatchOperation]) -> Result<JsonValue, PatchError> {
    validate(ops)?;

    let mut working = document.clone();
    for (op_index, op) in ops.iter().enumerate() {
        tracing::debug!(op_index, op = op.op_name(), path = %op.path(), "applying patch operation");
        apply_operation(&mut working, op).map_err(|kind| {
            tracing::debug!(op_index, error = %kind, "patch aborted");
            PatchError::new(op_index, kind)
        })?;
    }
    Ok(working)
}

/// Reads a patch document and applies it.
pub fn apply_patch_document(
    document: &JsonValue,
    patch: &JsonValue,
) -> Result<JsonValue, PatchError> {
    let ops = parse_patch(patch)?;
    apply_patch(document, &ops)
}

fn apply_operation(doc: &mut JsonValue, op: &PatchOperation) -> Result<(), PatchErrorKind> {
    match op {
        PatchOperation::Add { path, value } => add(doc, path, value.clone()),
        PatchOperation::Remove { path } => remove(doc, path).map(drop),
        PatchOperation::Replace { path, value } => {
            *get_mut(doc, path)? = value.clone();
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            if path.starts_with(from) {
                return Err(PatchErrorKind::MoveIntoSelf {
                    from: from.clone(),
                    path: path.clone(),
                });
            }
            let value = remove(doc, from)?;
            add(doc, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = get(doc, from)?.clone();
            add(doc, path, value)
        }
        PatchOperation::Test { path, value } => {
            let actual = get(doc, path)?;
            if actual == value {
                Ok(())
            } else {
                Err(PatchErrorKind::TestFailed {
                    path: path.clone(),
                    expected: value.clone(),
                    actual: actual.clone(),
                })
            }
        }
    }
}

fn add(doc: &mut JsonValue, path: &JsonPointer, value: JsonValue) -> Result<(), PatchErrorKind> {
    let Some((parent, last)) = parent_mut(doc, path)? else {
        *doc = value;
        return Ok(());
    };

    match parent {
        JsonValue::Object(map) => {
            map.insert(last.as_key().into_owned(), value);
            Ok(())
        }
        JsonValue::Array(items) => match last {
            PathToken::Index(index) if *index <= items.len() => {
                items.insert(*index, value);
                Ok(())
            }
            PathToken::Index(index) => Err(PatchErrorKind::OutOfBounds {
                path: path.clone(),
                index: *index,
                len: items.len(),
            }),
            PathToken::Append => {
                items.push(value);
                Ok(())
            }
            PathToken::Key(_) => Err(type_mismatch(path, "an array index or \"-\"")),
        },
        _ => Err(type_mismatch(path, "an object or array parent")),
    }
}

fn remove(doc: &mut JsonValue, path: &JsonPointer) -> Result<JsonValue, PatchErrorKind> {
    let Some((parent, last)) = parent_mut(doc, path)? else {
        return Err(PatchErrorKind::Malformed {
            reason: "cannot remove the document root".to_string(),
        });
    };

    match parent {
        JsonValue::Object(map) => map
            .shift_remove(&*last.as_key())
            .ok_or_else(|| not_found(path)),
        JsonValue::Array(items) => match last {
            PathToken::Index(index) if *index < items.len() => Ok(items.remove(*index)),
            PathToken::Index(_) | PathToken::Append => Err(not_found(path)),
            PathToken::Key(_) => Err(type_mismatch(path, "an array index")),
        },
        _ => Err(type_mismatch(path, "an object or array parent")),
    }
}

/// Resolves everything but the last token. `None` means `path` is the root.
fn parent_mut<'a, 'p>(
    doc: &'a mut JsonValue,
    path: &'p JsonPointer,
) -> Result<Option<(&'a mut JsonValue, &'p PathToken)>, PatchErrorKind> {
    let Some((last, ancestors)) = path.tokens().split_last() else {
        return Ok(None);
    };
    let mut current = doc;
    for token in ancestors {
        current = step_mut(current, token, path)?;
    }
    Ok(Some((current, last)))
}

fn get<'a>(doc: &'a JsonValue, path: &JsonPointer) -> Result<&'a JsonValue, PatchErrorKind> {
    let mut current = doc;
    for token in path.tokens() {
        current = match current {
            JsonValue::Object(map) => map.get(&*token.as_key()).ok_or_else(|| not_found(path))?,
            JsonValue::Array(items) => match token {
                PathToken::Index(index) => items.get(*index).ok_or_else(|| not_found(path))?,
                PathToken::Append => return Err(not_found(path)),
                PathToken::Key(_) => return Err(type_mismatch(path, "an array index")),
            },
            _ => return Err(type_mismatch(path, "an object or array")),
        };
    }
    Ok(current)
}

fn get_mut<'a>(
    doc: &'a mut JsonValue,
    path: &JsonPointer,
) -> Result<&'a mut JsonValue, PatchErrorKind> {
    let mut current = doc;
    for token in path.tokens() {
        current = step_mut(current, token, path)?;
    }
    Ok(current)
}

fn step_mut<'a>(
    value: &'a mut JsonValue,
    token: &PathToken,
    path: &JsonPointer,
) -> Result<&'a mut JsonValue, PatchErrorKind> {
    match value {
        JsonValue::Object(map) => map.get_mut(&*token.as_key()).ok_or_else(|| not_found(path)),
        JsonValue::Array(items) => match token {
            PathToken::Index(index) => items.get_mut(*index).ok_or_else(|| not_found(path)),
            PathToken::Append => Err(not_found(path)),
            PathToken::Key(_) => Err(type_mismatch(path, "an array index")),
        },
        _ => Err(type_mismatch(path, "an object or array")),
    }
}

fn not_found(path: &JsonPointer) -> PatchErrorKind {
    PatchErrorKind::NotFound { path: path.clone() }
}

fn type_mismatch(path: &JsonPointer, expected: &'static str) -> PatchErrorKind {
    PatchErrorKind::TypeMismatch {
        path: path.clone(),
        expected,
    }
}
