//! Escaping of user path patterns for SQL `LIKE` matching.
//!
//! Everything that knows about `LIKE` syntax lives here. The store binds the
//! pattern and appends `ESCAPE '/'`; callers only ever see raw paths with an
//! optional `*` wildcard.

use std::fmt;

/// Escape character used in every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '/';

/// A sanitized `LIKE` pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern(String);

impl LikePattern {
    /// Pattern for an exact path, honoring `*` as a wildcard.
    ///
    /// An empty path matches everything.
    pub fn path(raw: &str) -> Self {
        let sanitized = sanitize_query_param(raw);
        if sanitized.is_empty() {
            return Self("%".to_string());
        }
        Self(sanitized)
    }

    /// Pattern matching every strict descendant of a stored path.
    ///
    /// `path` is taken literally: a `*` in a stored name only matches `*`.
    pub fn literal_descendants_of(path: &str) -> Self {
        Self(escape_like_literal(path)).with_descendants()
    }

    /// Appends the descendant suffix (`<escaped />%`) to this pattern.
    pub fn with_descendants(mut self) -> Self {
        self.0.push(LIKE_ESCAPE);
        self.0.push('/');
        self.0.push('%');
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escapes `/`, `%` and `_` with `/`, then turns `*` into `%`.
pub fn sanitize_query_param(raw: &str) -> String {
    escape_like_literal(raw).replace('*', "%")
}

/// Escapes `/`, `%` and `_` with `/`; nothing else is special.
///
/// The escape character itself is escaped first so that the escapes added
/// for `%` and `_` are not doubled.
pub fn escape_like_literal(raw: &str) -> String {
    raw.replace('/', "//").replace('%', "/%").replace('_', "/_")
}
