//! The JSON value model every algorithm in this crate operates on.
//!
//! Objects keep their keys in insertion order. Equality is structural: two
//! objects are equal when they hold the same key/value pairs in any order,
//! arrays are equal element by element.

use crate::pointer::{JsonPointer, PathToken};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Insertion-ordered mapping used for JSON objects.
pub type Map = IndexMap<String, JsonValue>;

/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A JSON number.
///
/// Integers keep their exact value; only numbers written with a fraction or
/// exponent are held as `f64`. Equality is by numeric value, so `1` equals
/// `1.0`, and `NaN` equals itself so that a value always equals its copy.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// An integer that fits in an `i64`
    Int(i64),
    /// An integer above `i64::MAX`
    UInt(u64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::UInt(u) => u as f64,
            Number::Float(f) => f,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|i| i64::try_from(i).ok())
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, Number::Float(_))
    }

    /// The exact integral value, for integers and whole floats.
    fn as_i128(&self) -> Option<i128> {
        match *self {
            Number::Int(i) => Some(i128::from(i)),
            Number::UInt(u) => Some(i128::from(u)),
            Number::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e38 => {
                Some(f as i128)
            }
            Number::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Float(a), Number::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => match (self.as_i128(), other.as_i128()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

fn is_whole(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{}", i),
            Number::UInt(u) => write!(f, "{}", u),
            Number::Float(n) if is_whole(n) => write!(f, "{}", n as i64),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Number::Int(i),
            Err(_) => Number::UInt(u),
        }
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl From<serde_json::Number> for Number {
    fn from(n: serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::Int(i)
        } else if let Some(u) = n.as_u64() {
            Number::UInt(u)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<&serde_yaml::Number> for Number {
    fn from(n: &serde_yaml::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::Int(i)
        } else if let Some(u) = n.as_u64() {
            Number::UInt(u)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::Int(i) => serializer.serialize_i64(i),
            Number::UInt(u) => serializer.serialize_u64(u),
            Number::Float(f) => serializer.serialize_f64(f),
        }
    }
}

/// A value in a JSON-shaped document.
#[derive(Debug, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonValue>),
    Object(Map),
}

impl JsonValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a member of an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Looks up the value a pointer addresses, if there is one.
    ///
    /// Object members are matched by the token's text, so `/0` finds the key
    /// `"0"` in an object and the first element in an array.
    pub fn pointer(&self, pointer: &JsonPointer) -> Option<&JsonValue> {
        let mut current = self;
        for token in pointer.tokens() {
            current = match (current, token) {
                (JsonValue::Object(map), token) => map.get(&*token.as_key())?,
                (JsonValue::Array(items), PathToken::Index(index)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns a short preview of the value, truncated to max_len.
    pub fn preview(&self, max_len: usize) -> String {
        let preview = match self {
            JsonValue::Null => "null".to_string(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => n.to_string(),
            JsonValue::String(s) => format!("{:?}", s),
            JsonValue::Object(map) => match map.len() {
                0 => "{}".to_string(),
                1 => "{ 1 key }".to_string(),
                count => format!("{{ {} keys }}", count),
            },
            JsonValue::Array(items) => match items.len() {
                0 => "[]".to_string(),
                1 => "[ 1 item ]".to_string(),
                count => format!("[ {} items ]", count),
            },
        };

        if preview.chars().count() > max_len {
            let kept: String = preview.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", kept)
        } else {
            preview
        }
    }
}

impl PartialEq for JsonValue {
    /// Structural equality, walked with an explicit stack so deeply nested
    /// documents cannot exhaust the call stack.
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];

        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (JsonValue::Null, JsonValue::Null) => {}
                (JsonValue::Bool(x), JsonValue::Bool(y)) if x == y => {}
                (JsonValue::Number(x), JsonValue::Number(y)) if x == y => {}
                (JsonValue::String(x), JsonValue::String(y)) if x == y => {}
                (JsonValue::Array(x), JsonValue::Array(y)) if x.len() == y.len() => {
                    pending.extend(x.iter().zip(y.iter()));
                }
                (JsonValue::Object(x), JsonValue::Object(y)) if x.len() == y.len() => {
                    for (key, value) in x {
                        match y.get(key) {
                            Some(other_value) => pending.push((value, other_value)),
                            None => return false,
                        }
                    }
                }
                _ => return false,
            }
        }

        true
    }
}

impl Clone for JsonValue {
    /// Deep copy, built bottom-up from an explicit stack like `eq`.
    fn clone(&self) -> Self {
        let mut stack: Vec<CloneFrame<'_>> = Vec::new();
        let mut next = self;

        loop {
            let mut finished = match next {
                JsonValue::Null => Some(JsonValue::Null),
                JsonValue::Bool(b) => Some(JsonValue::Bool(*b)),
                JsonValue::Number(n) => Some(JsonValue::Number(*n)),
                JsonValue::String(s) => Some(JsonValue::String(s.clone())),
                JsonValue::Array(items) => {
                    stack.push(CloneFrame::Array(Vec::with_capacity(items.len()), items.iter()));
                    None
                }
                JsonValue::Object(map) => {
                    stack.push(CloneFrame::Object(
                        Map::with_capacity(map.len()),
                        map.iter(),
                        None,
                    ));
                    None
                }
            };

            loop {
                let frame = match stack.last_mut() {
                    Some(frame) => frame,
                    None => return finished.unwrap_or_default(),
                };
                if let Some(value) = finished.take() {
                    frame.push(value);
                }
                match frame.next_child() {
                    Some(child) => {
                        next = child;
                        break;
                    }
                    None => finished = stack.pop().map(CloneFrame::finish),
                }
            }
        }
    }
}

/// A container being copied, with the source children still to visit.
enum CloneFrame<'a> {
    Array(Vec<JsonValue>, std::slice::Iter<'a, JsonValue>),
    Object(
        Map,
        indexmap::map::Iter<'a, String, JsonValue>,
        Option<&'a String>,
    ),
}

impl<'a> CloneFrame<'a> {
    fn next_child(&mut self) -> Option<&'a JsonValue> {
        match self {
            CloneFrame::Array(_, items) => items.next(),
            CloneFrame::Object(_, members, pending) => members.next().map(|(key, value)| {
                *pending = Some(key);
                value
            }),
        }
    }

    fn push(&mut self, value: JsonValue) {
        match self {
            CloneFrame::Array(out, _) => out.push(value),
            CloneFrame::Object(out, _, pending) => {
                if let Some(key) = pending.take() {
                    out.insert(key.clone(), value);
                }
            }
        }
    }

    fn finish(self) -> JsonValue {
        match self {
            CloneFrame::Array(out, _) => JsonValue::Array(out),
            CloneFrame::Object(out, _, _) => JsonValue::Object(out),
        }
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<Number> for JsonValue {
    fn from(n: Number) -> Self {
        JsonValue::Number(n)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(Number::Float(n))
    }
}

impl From<i32> for JsonValue {
    fn from(n: i32) -> Self {
        JsonValue::Number(Number::Int(i64::from(n)))
    }
}

impl From<i64> for JsonValue {
    fn from(n: i64) -> Self {
        JsonValue::Number(Number::Int(n))
    }
}

impl From<u64> for JsonValue {
    fn from(n: u64) -> Self {
        JsonValue::Number(Number::from(n))
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }
}

impl From<Map> for JsonValue {
    fn from(map: Map) -> Self {
        JsonValue::Object(map)
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => JsonValue::Number(Number::from(n)),
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(obj) => JsonValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&JsonValue> for serde_json::Value {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => serde_json::Value::Null,
            JsonValue::Bool(b) => serde_json::Value::Bool(*b),
            JsonValue::Number(Number::Int(i)) => serde_json::Value::from(*i),
            JsonValue::Number(Number::UInt(u)) => serde_json::Value::from(*u),
            // JSON has no spelling for NaN or the infinities.
            JsonValue::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            JsonValue::String(s) => serde_json::Value::String(s.clone()),
            JsonValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            JsonValue::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// YAML has features beyond JSON (anchors, tags). Those are evaluated during
/// parsing, so the resulting value is the fully-evaluated document. Non-string
/// keys are converted to strings.
impl From<serde_yaml::Value> for JsonValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => JsonValue::Null,
            serde_yaml::Value::Bool(b) => JsonValue::Bool(b),
            serde_yaml::Value::Number(n) => JsonValue::Number(Number::from(&n)),
            serde_yaml::Value::String(s) => JsonValue::String(s),
            serde_yaml::Value::Sequence(seq) => {
                JsonValue::Array(seq.into_iter().map(JsonValue::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => JsonValue::Object(
                mapping
                    .into_iter()
                    .map(|(k, v)| {
                        let key = match k {
                            serde_yaml::Value::String(s) => s,
                            serde_yaml::Value::Number(n) => n.to_string(),
                            serde_yaml::Value::Bool(b) => b.to_string(),
                            serde_yaml::Value::Null => "null".to_string(),
                            other => format!("{:?}", other),
                        };
                        (key, JsonValue::from(v))
                    })
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => JsonValue::from(tagged.value),
        }
    }
}

impl From<toml::Value> for JsonValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => JsonValue::String(s),
            toml::Value::Integer(i) => JsonValue::Number(Number::Int(i)),
            toml::Value::Float(f) => JsonValue::Number(Number::Float(f)),
            toml::Value::Boolean(b) => JsonValue::Bool(b),
            toml::Value::Datetime(dt) => JsonValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            toml::Value::Table(table) => JsonValue::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Number(n) => n.serialize(serializer),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Array(items) => serializer.collect_seq(items),
            JsonValue::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(JsonValue::from)
    }
}
