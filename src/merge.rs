//! JSON Merge Patch (RFC 7396).
//!
//! A merge patch is a partial document with the same shape as its target.
//! Objects merge key by key, `null` deletes a key, and anything that is not
//! an object replaces the target outright.

use crate::tree::{JsonValue, Map};

/// Applies a merge patch, returning the merged document.
///
/// This never fails. Keys the patch does not mention are carried over,
/// existing keys keep their position and new keys are appended.
///
/// # Examples
///
/// ```
/// use jdelta::{apply_merge_patch, parse_json};
///
/// let target = parse_json(r#"{"a": "b", "c": {"d": "e", "f": "g"}}"#).unwrap();
/// let patch = parse_json(r#"{"a": "z", "c": {"f": null}}"#).unwrap();
///
/// let merged = apply_merge_patch(&target, &patch);
/// assert_eq!(merged, parse_json(r#"{"a": "z", "c": {"d": "e"}}"#).unwrap());
/// ```
pub fn apply_merge_patch(target: &JsonValue, patch: &JsonValue) -> JsonValue {
    if !patch.is_object() {
        return patch.clone();
    }

    // Nested patch objects are merged from an explicit stack, one frame per
    // object still being filled in.
    let mut stack: Vec<MergeFrame<'_>> = Vec::new();
    let mut target = target.clone();
    let mut patch = patch;

    loop {
        let mut merged = match patch {
            JsonValue::Object(members) => {
                let result = match target {
                    JsonValue::Object(existing) => existing,
                    _ => Map::new(),
                };
                stack.push(MergeFrame {
                    result,
                    members: members.iter(),
                    pending: None,
                });
                None
            }
            _ => Some(patch.clone()),
        };

        loop {
            let frame = match stack.last_mut() {
                Some(frame) => frame,
                None => return merged.unwrap_or_default(),
            };
            if let (Some(key), Some(value)) = (frame.pending.take(), merged.take()) {
                frame.result.insert(key.clone(), value);
            }
            match frame.next_member() {
                Some((child_target, child_patch)) => {
                    target = child_target;
                    patch = child_patch;
                    break;
                }
                None => merged = stack.pop().map(|frame| JsonValue::Object(frame.result)),
            }
        }
    }
}

/// An object whose patch members are still being applied.
struct MergeFrame<'a> {
    result: Map,
    members: indexmap::map::Iter<'a, String, JsonValue>,
    /// Key of the member currently being merged below this frame
    pending: Option<&'a String>,
}

impl<'a> MergeFrame<'a> {
    /// Applies deletions up to the next member that needs merging and hands
    /// back its current value together with its patch.
    fn next_member(&mut self) -> Option<(JsonValue, &'a JsonValue)> {
        for (key, patch_value) in self.members.by_ref() {
            if patch_value.is_null() {
                self.result.shift_remove(key);
                continue;
            }
            // Taking the value leaves a placeholder, so the key keeps its slot.
            let existing = self
                .result
                .get_mut(key)
                .map(std::mem::take)
                .unwrap_or_default();
            self.pending = Some(key);
            return Some((existing, patch_value));
        }
        None
    }
}
