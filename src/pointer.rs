//! JSON Pointer addressing (RFC 6901).
//!
//! A [`JsonPointer`] is an ordered sequence of [`PathToken`]s. Its canonical
//! string form joins the tokens with `/`, escaping `~` as `~0` and `/` as `~1`.
//! The empty pointer addresses the document root and renders as `""`.
//!
//! Diff paths can also be rendered in a dotted form (`$.a.b[0]`) for display.
//!
//! # Examples
//!
//! ```
//! use jdelta::pointer::{JsonPointer, PathToken};
//!
//! let pointer: JsonPointer = "/a~1b/0".parse().unwrap();
//! assert_eq!(
//!     pointer.tokens(),
//!     &[PathToken::Key("a/b".to_string()), PathToken::Index(0)]
//! );
//! assert_eq!(pointer.to_string(), "/a~1b/0");
//! assert_eq!(pointer.to_dotted(), r#"$["a/b"][0]"#);
//! ```

use crate::error::PointerError;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A single step in a pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathToken {
    /// Object member name
    Key(String),
    /// Array position
    Index(usize),
    /// The `-` marker, "one past the end" of an array
    Append,
}

impl PathToken {
    /// Classifies an unescaped pointer segment.
    ///
    /// `-` is the append marker, a canonical decimal (no leading zeros) is an
    /// index, anything else is a key.
    pub fn from_segment(segment: &str) -> Self {
        if segment == "-" {
            return PathToken::Append;
        }
        let canonical = !segment.is_empty()
            && segment.bytes().all(|b| b.is_ascii_digit())
            && (segment == "0" || !segment.starts_with('0'));
        if canonical {
            if let Ok(index) = segment.parse() {
                return PathToken::Index(index);
            }
        }
        PathToken::Key(segment.to_string())
    }

    /// The token's text, as used when the token addresses an object member.
    ///
    /// Per RFC 6901 an object parent always looks members up by this text, so
    /// `Index(0)` and `Append` name the keys `"0"` and `"-"` there.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            PathToken::Key(key) => Cow::Borrowed(key),
            PathToken::Index(index) => Cow::Owned(index.to_string()),
            PathToken::Append => Cow::Borrowed("-"),
        }
    }

    pub fn is_append(&self) -> bool {
        matches!(self, PathToken::Append)
    }
}

impl From<&str> for PathToken {
    fn from(key: &str) -> Self {
        PathToken::Key(key.to_string())
    }
}

impl From<String> for PathToken {
    fn from(key: String) -> Self {
        PathToken::Key(key)
    }
}

impl From<usize> for PathToken {
    fn from(index: usize) -> Self {
        PathToken::Index(index)
    }
}

/// A location within a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    tokens: Vec<PathToken>,
}

impl JsonPointer {
    /// The pointer to the document root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: Vec<PathToken>) -> Self {
        Self { tokens }
    }

    /// Decodes the slash-separated string form.
    pub fn parse(pointer: &str) -> Result<Self, PointerError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(PointerError::MissingLeadingSlash {
                pointer: pointer.to_string(),
            });
        };

        let mut tokens = Vec::new();
        let mut offset = 1;
        for segment in rest.split('/') {
            let unescaped = unescape(segment).map_err(|at| PointerError::InvalidEscape {
                pointer: pointer.to_string(),
                position: offset + at,
            })?;
            tokens.push(PathToken::from_segment(&unescaped));
            offset += segment.len() + 1;
        }
        Ok(Self { tokens })
    }

    /// Encodes the pointer in its canonical string form.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            out.push('/');
            out.push_str(&escape(&token.as_key()));
        }
        out
    }

    /// Renders the pointer as `$.a.b[0]`.
    ///
    /// Keys that are not plain identifiers are quoted: `$["a b"]`.
    pub fn to_dotted(&self) -> String {
        let mut out = String::from("$");
        for token in &self.tokens {
            match token {
                PathToken::Key(key) if is_identifier(key) => {
                    out.push('.');
                    out.push_str(key);
                }
                PathToken::Key(key) => out.push_str(&format!("[{:?}]", key)),
                PathToken::Index(index) => out.push_str(&format!("[{}]", index)),
                PathToken::Append => out.push_str("[-]"),
            }
        }
        out
    }

    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn last(&self) -> Option<&PathToken> {
        self.tokens.last()
    }

    /// The pointer to the containing value, or `None` at the root.
    pub fn parent(&self) -> Option<JsonPointer> {
        self.tokens.split_last().map(|(_, parent)| JsonPointer {
            tokens: parent.to_vec(),
        })
    }

    pub fn push(&mut self, token: impl Into<PathToken>) {
        self.tokens.push(token.into());
    }

    /// Returns a new pointer one level deeper.
    pub fn child(&self, token: impl Into<PathToken>) -> JsonPointer {
        let mut child = self.clone();
        child.push(token);
        child
    }

    /// True if `prefix` addresses this location or one of its ancestors.
    ///
    /// Tokens are compared by text, so `/a/1` starts with `/a/1` whether the
    /// `1` was built as a key or an index.
    pub fn starts_with(&self, prefix: &JsonPointer) -> bool {
        prefix.tokens.len() <= self.tokens.len()
            && prefix
                .tokens
                .iter()
                .zip(&self.tokens)
                .all(|(a, b)| a.as_key() == b.as_key())
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for JsonPointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPointer::parse(s)
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl From<Vec<PathToken>> for JsonPointer {
    fn from(tokens: Vec<PathToken>) -> Self {
        Self { tokens }
    }
}

fn escape(segment: &str) -> Cow<'_, str> {
    if segment.contains(['~', '/']) {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Un-escapes a segment, returning the byte offset of a bad `~` on failure.
fn unescape(segment: &str) -> Result<Cow<'_, str>, usize> {
    if !segment.contains('~') {
        return Ok(Cow::Borrowed(segment));
    }

    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.char_indices();
    while let Some((at, c)) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '0')) => out.push('~'),
            Some((_, '1')) => out.push('/'),
            _ => return Err(at),
        }
    }
    Ok(Cow::Owned(out))
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
