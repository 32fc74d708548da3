//! Core structural diff algorithm.
//!
//! This module compares two JSON values and produces an ordered list of
//! location-tagged differences. The traversal is pre-order and depth-first:
//! equal subtrees contribute nothing, values of different kinds are reported
//! as a single change, and containers of the same kind are compared member by
//! member.
//!
//! Arrays are compared by position. Inserting an element in the middle of an
//! array shifts every later index and shows up as a run of `Changed` entries
//! followed by an `Added` one; there is no edit-distance alignment.
//!
//! # Examples
//!
//! ```
//! use jdelta::{compute_diff, parse_json, ChangeKind, DiffConfig};
//!
//! let old = parse_json(r#"{"a": 1, "b": 2}"#).unwrap();
//! let new = parse_json(r#"{"a": 1, "b": 3}"#).unwrap();
//!
//! let diff = compute_diff(&old, &new, &DiffConfig::default());
//!
//! assert_eq!(diff.entries.len(), 1);
//! assert_eq!(diff.entries[0].path.to_string(), "/b");
//! assert_eq!(diff.entries[0].kind, ChangeKind::Changed);
//! ```

use crate::patch::PatchOperation;
use crate::pointer::{JsonPointer, PathToken};
use crate::tree::JsonValue;
use serde::Serialize;

/// The kind of difference found at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Location exists in new but not old
    Added,
    /// Location exists in old but not new
    Removed,
    /// Location exists in both with unequal values
    Changed,
}

/// A single difference between two documents.
///
/// `Added` entries carry only `new_value`, `Removed` entries only
/// `old_value`, and `Changed` entries carry both (and they are unequal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub path: JsonPointer,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<JsonValue>,
}

impl DiffEntry {
    pub fn added(path: JsonPointer, value: JsonValue) -> Self {
        Self {
            path,
            kind: ChangeKind::Added,
            old_value: None,
            new_value: Some(value),
        }
    }

    pub fn removed(path: JsonPointer, value: JsonValue) -> Self {
        Self {
            path,
            kind: ChangeKind::Removed,
            old_value: Some(value),
            new_value: None,
        }
    }

    pub fn changed(path: JsonPointer, old: JsonValue, new: JsonValue) -> Self {
        Self {
            path,
            kind: ChangeKind::Changed,
            old_value: Some(old),
            new_value: Some(new),
        }
    }

    /// The same difference seen from the other side.
    pub fn mirror(&self) -> Self {
        let kind = match self.kind {
            ChangeKind::Added => ChangeKind::Removed,
            ChangeKind::Removed => ChangeKind::Added,
            ChangeKind::Changed => ChangeKind::Changed,
        };
        Self {
            path: self.path.clone(),
            kind,
            old_value: self.new_value.clone(),
            new_value: self.old_value.clone(),
        }
    }
}

/// Statistics about the diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_entries(entries: &[DiffEntry]) -> Self {
        let mut stats = Self::new();
        for entry in entries {
            match entry.kind {
                ChangeKind::Added => stats.added += 1,
                ChangeKind::Removed => stats.removed += 1,
                ChangeKind::Changed => stats.changed += 1,
            }
        }
        stats
    }

    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }
}

/// The complete diff result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diff {
    pub entries: Vec<DiffEntry>,
    pub stats: DiffStats,
}

impl Diff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a diff from entries, recomputing the statistics.
    pub fn from_entries(entries: Vec<DiffEntry>) -> Self {
        let stats = DiffStats::from_entries(&entries);
        Self { entries, stats }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The diff from `new` back to `old`.
    pub fn invert(&self) -> Diff {
        Diff::from_entries(self.entries.iter().map(DiffEntry::mirror).collect())
    }

    /// Converts the diff into JSON Patch operations.
    ///
    /// Applying the result to the old document yields the new one. Trailing
    /// array removals are emitted from the highest index down so earlier
    /// removals do not shift later ones.
    pub fn to_patch(&self) -> Vec<PatchOperation> {
        let mut ops = Vec::with_capacity(self.entries.len());
        let mut removals: Vec<PatchOperation> = Vec::new();
        let mut removal_parent: Option<JsonPointer> = None;

        for entry in &self.entries {
            let array_removal = entry.kind == ChangeKind::Removed
                && matches!(entry.path.last(), Some(PathToken::Index(_)));
            let parent = entry.path.parent();

            if !(array_removal && parent == removal_parent) {
                ops.extend(removals.drain(..).rev());
                removal_parent = None;
            }

            match (entry.kind, &entry.old_value, &entry.new_value) {
                (ChangeKind::Added, _, Some(value)) => ops.push(PatchOperation::Add {
                    path: entry.path.clone(),
                    value: value.clone(),
                }),
                (ChangeKind::Removed, _, _) if array_removal => {
                    removals.push(PatchOperation::Remove {
                        path: entry.path.clone(),
                    });
                    removal_parent = parent;
                }
                (ChangeKind::Removed, _, _) => ops.push(PatchOperation::Remove {
                    path: entry.path.clone(),
                }),
                (ChangeKind::Changed, _, Some(value)) => ops.push(PatchOperation::Replace {
                    path: entry.path.clone(),
                    value: value.clone(),
                }),
                // Entries built through the constructors always carry their values.
                _ => {}
            }
        }
        ops.extend(removals.drain(..).rev());
        ops
    }
}

/// Configuration for the diff algorithm.
#[derive(Debug, Clone, Default)]
pub struct DiffConfig {
    /// Normalize whitespace in strings (trim and collapse runs of spaces)
    pub ignore_whitespace: bool,
}

/// Pending work for the traversal. Frames are popped in document order.
enum Frame<'a> {
    Compare {
        old: &'a JsonValue,
        new: &'a JsonValue,
        path: JsonPointer,
    },
    Emit(DiffEntry),
}

/// Computes the structural diff between two values.
///
/// The result is deterministic and the function never fails.
///
/// # Examples
///
/// ```
/// use jdelta::{compute_diff, DiffConfig, JsonValue};
///
/// let diff = compute_diff(
///     &JsonValue::from(42i64),
///     &JsonValue::from(43i64),
///     &DiffConfig::default(),
/// );
///
/// assert_eq!(diff.stats.changed, 1);
/// ```
pub fn compute_diff(old: &JsonValue, new: &JsonValue, config: &DiffConfig) -> Diff {
    let mut entries = Vec::new();
    let mut stack = vec![Frame::Compare {
        old,
        new,
        path: JsonPointer::root(),
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Emit(entry) => entries.push(entry),
            Frame::Compare { old, new, path } => {
                if values_equal(old, new, config) {
                    continue;
                }
                let children = match (old, new) {
                    (JsonValue::Object(_), JsonValue::Object(_))
                    | (JsonValue::Array(_), JsonValue::Array(_)) => {
                        Some(child_frames(old, new, &path))
                    }
                    _ => None,
                };
                match children {
                    // Reversed so the first child is popped first.
                    Some(children) => stack.extend(children.into_iter().rev()),
                    None => entries.push(DiffEntry::changed(path, old.clone(), new.clone())),
                }
            }
        }
    }

    let diff = Diff::from_entries(entries);
    tracing::trace!(
        added = diff.stats.added,
        removed = diff.stats.removed,
        changed = diff.stats.changed,
        "computed diff"
    );
    diff
}

/// Lists the comparisons for two containers of the same kind, in order.
fn child_frames<'a>(
    old: &'a JsonValue,
    new: &'a JsonValue,
    path: &JsonPointer,
) -> Vec<Frame<'a>> {
    match (old, new) {
        (JsonValue::Array(old_items), JsonValue::Array(new_items)) => {
            let len = old_items.len().max(new_items.len());
            (0..len)
                .filter_map(|i| {
                    let path = path.child(i);
                    match (old_items.get(i), new_items.get(i)) {
                        (Some(old), Some(new)) => Some(Frame::Compare { old, new, path }),
                        (Some(old), None) => Some(Frame::Emit(DiffEntry::removed(path, old.clone()))),
                        (None, Some(new)) => Some(Frame::Emit(DiffEntry::added(path, new.clone()))),
                        (None, None) => None,
                    }
                })
                .collect()
        }
        (JsonValue::Object(old_map), JsonValue::Object(new_map)) => {
            let mut frames = Vec::with_capacity(old_map.len().max(new_map.len()));
            for (key, old_value) in old_map {
                let path = path.child(key.as_str());
                frames.push(match new_map.get(key) {
                    Some(new_value) => Frame::Compare {
                        old: old_value,
                        new: new_value,
                        path,
                    },
                    None => Frame::Emit(DiffEntry::removed(path, old_value.clone())),
                });
            }
            for (key, new_value) in new_map {
                if !old_map.contains_key(key) {
                    let path = path.child(key.as_str());
                    frames.push(Frame::Emit(DiffEntry::added(path, new_value.clone())));
                }
            }
            frames
        }
        _ => Vec::new(),
    }
}

/// Checks if two values are equal according to the configuration.
fn values_equal(old: &JsonValue, new: &JsonValue, config: &DiffConfig) -> bool {
    if config.ignore_whitespace {
        if let (JsonValue::String(s1), JsonValue::String(s2)) = (old, new) {
            return normalize_whitespace(s1) == normalize_whitespace(s2);
        }
    }
    old == new
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
