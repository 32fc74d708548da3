//! Path filtering for diff results.
//!
//! Patterns use pointer syntax with wildcards, so they can be narrowed or
//! widened to whole subtrees.
//!
//! # Pattern Syntax
//!
//! - `/foo` - matches the member "foo" at the top level
//! - `*` - matches any single path segment
//! - `**` - matches any number of path segments (including zero)
//! - `/foo/bar` - matches nested path "foo/bar"
//! - `/**/version` - matches "version" at any depth
//! - `~0` and `~1` escape `~` and `/` as in a pointer
//!
//! # Examples
//!
//! ```
//! use jdelta::filter::PathPattern;
//! use jdelta::pointer::JsonPointer;
//!
//! let pattern = PathPattern::parse("/metadata/timestamp");
//! assert!(pattern.matches(&"/metadata/timestamp".parse::<JsonPointer>().unwrap()));
//!
//! let pattern = PathPattern::parse("/**/version");
//! assert!(pattern.matches(&"/package/version".parse::<JsonPointer>().unwrap()));
//! assert!(pattern.matches(&"/dependencies/0/version".parse::<JsonPointer>().unwrap()));
//! ```

use crate::diff::Diff;
use crate::pointer::{JsonPointer, PathToken};

/// A single segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Matches a segment with exactly this text
    Literal(String),
    /// Matches any single path segment (*)
    SingleWildcard,
    /// Matches any number of path segments (**)
    DoubleWildcard,
}

/// A compiled path pattern for matching against diff paths.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pub segments: Vec<PatternSegment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);
        if trimmed.is_empty() {
            return Self {
                segments: Vec::new(),
            };
        }
        let segments = trimmed
            .split('/')
            .map(|s| match s {
                "**" => PatternSegment::DoubleWildcard,
                "*" => PatternSegment::SingleWildcard,
                _ => PatternSegment::Literal(s.replace("~1", "/").replace("~0", "~")),
            })
            .collect();
        Self { segments }
    }

    pub fn matches(&self, path: &JsonPointer) -> bool {
        matches_segments(&self.segments, path.tokens())
    }
}

fn matches_segments(pattern: &[PatternSegment], path: &[PathToken]) -> bool {
    match (pattern.first(), path.first()) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some(_), None) => pattern
            .iter()
            .all(|s| matches!(s, PatternSegment::DoubleWildcard)),
        (Some(seg), Some(token)) => match seg {
            PatternSegment::Literal(lit) => {
                *lit == token.as_key() && matches_segments(&pattern[1..], &path[1..])
            }
            PatternSegment::SingleWildcard => matches_segments(&pattern[1..], &path[1..]),
            PatternSegment::DoubleWildcard => {
                matches_segments(&pattern[1..], path) || matches_segments(pattern, &path[1..])
            }
        },
    }
}

/// Configuration for filtering diff results.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Patterns for paths to ignore (exclude from output)
    pub ignore_patterns: Vec<PathPattern>,
    /// Patterns for paths to include (if non-empty, only these are shown)
    pub only_patterns: Vec<PathPattern>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.ignore_patterns.push(PathPattern::parse(pattern));
        self
    }

    pub fn only(mut self, pattern: &str) -> Self {
        self.only_patterns.push(PathPattern::parse(pattern));
        self
    }

    pub fn has_filters(&self) -> bool {
        !self.ignore_patterns.is_empty() || !self.only_patterns.is_empty()
    }

    pub fn should_include(&self, path: &JsonPointer) -> bool {
        if self.ignore_patterns.iter().any(|p| p.matches(path)) {
            return false;
        }
        self.only_patterns.is_empty() || self.only_patterns.iter().any(|p| p.matches(path))
    }
}

/// Filters a diff based on the filter configuration.
pub fn filter_diff(diff: &Diff, config: &FilterConfig) -> Diff {
    if !config.has_filters() {
        return diff.clone();
    }

    Diff::from_entries(
        diff.entries
            .iter()
            .filter(|entry| config.should_include(&entry.path))
            .cloned()
            .collect(),
    )
}
