//! The `Route` value type.
//!
//! # Responsibilities
//! - Normalize raw strings into canonical segment sequences
//! - Answer parent / child / ancestor questions
//! - Provide a stable string form for use as a map key
//!
//! # Normalization
//! - `\` and `/` are both separators
//! - Segments are trimmed; empty and `.` segments are dropped
//! - Segments are lowercased
//! - Control characters and `..` segments are rejected

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Bytes escaped in URL path segments. Covers everything
/// `from_request_path` would strip or decode.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Error raised when a raw string cannot be turned into a [`Route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("malformed route {raw:?}: {reason}")]
    Malformed { raw: String, reason: &'static str },
}

impl RouteError {
    fn malformed(raw: &str, reason: &'static str) -> Self {
        RouteError::Malformed {
            raw: raw.to_string(),
            reason,
        }
    }
}

/// Normalized hierarchical path identifier.
///
/// The root route has no segments and an empty string form. It is an
/// ancestor of every other route.
#[derive(Clone)]
pub struct Route {
    /// Canonical slash-joined form.
    value: Arc<str>,
    /// Normalized segments, in order.
    segments: Arc<[String]>,
}

impl Route {
    /// The root route (level 0).
    pub fn root() -> Self {
        Self::from_segments(Vec::new())
    }

    /// Parse a raw string into a normalized route.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if raw.chars().any(char::is_control) {
            return Err(RouteError::malformed(raw, "contains control characters"));
        }

        let mut segments = Vec::new();
        for segment in raw.split(['/', '\\']) {
            let segment = segment.trim();
            match segment {
                "" | "." => continue,
                ".." => return Err(RouteError::malformed(raw, "contains a parent segment")),
                s => segments.push(s.to_lowercase()),
            }
        }

        Ok(Self::from_segments(segments))
    }

    /// Build a route from an HTTP request path.
    ///
    /// Query string and fragment are stripped and the remainder is
    /// percent-decoded before normal parsing.
    pub fn from_request_path(raw: &str) -> Result<Self, RouteError> {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map_err(|_| RouteError::malformed(raw, "percent-decoded path is not UTF-8"))?;
        Self::parse(&decoded)
    }

    fn from_segments(segments: Vec<String>) -> Self {
        let value: Arc<str> = Arc::from(segments.join("/"));
        Self {
            value,
            segments: Arc::from(segments),
        }
    }

    /// Canonical string form.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Absolute URL path that `from_request_path` maps back to this route.
    pub fn to_url_path(&self) -> String {
        let mut path = String::with_capacity(self.value.len() + 1);
        for segment in self.segments.iter() {
            path.push('/');
            path.extend(utf8_percent_encode(segment, SEGMENT));
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments; the root has level 0.
    #[inline]
    pub fn level(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, `None` at the root.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The route with the last segment removed, `None` at the root.
    pub fn parent(&self) -> Option<Route> {
        match self.segments.split_last() {
            Some((_, rest)) => Some(Self::from_segments(rest.to_vec())),
            None => None,
        }
    }

    /// True iff `ancestor` is a strict prefix of this route.
    ///
    /// A route is never a child of itself.
    pub fn is_child_of(&self, ancestor: &Route) -> bool {
        ancestor.level() < self.level() && self.segments.starts_with(&ancestor.segments)
    }

    /// True iff this route sits exactly one level below `parent`.
    pub fn is_direct_child_of(&self, parent: &Route) -> bool {
        self.level() == parent.level() + 1 && self.is_child_of(parent)
    }

    /// Iterate the parent chain, deepest first, ending with the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Route> + '_ {
        (0..self.level()).rev().map(move |len| Self::from_segments(self.segments[..len].to_vec()))
    }

    /// Append a raw (possibly multi-segment) path.
    pub fn join(&self, raw: &str) -> Result<Route, RouteError> {
        let tail = Route::parse(raw)?;
        Ok(self.join_route(&tail))
    }

    pub fn join_route(&self, tail: &Route) -> Route {
        let mut segments = self.segments.to_vec();
        segments.extend(tail.segments.iter().cloned());
        Self::from_segments(segments)
    }

    /// The remainder of this route below `prefix`, if `prefix` is an ancestor.
    pub fn strip_prefix(&self, prefix: &Route) -> Option<Route> {
        if self == prefix {
            return Some(Route::root());
        }
        if !self.is_child_of(prefix) {
            return None;
        }
        Some(Self::from_segments(self.segments[prefix.level()..].to_vec()))
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::root()
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Route {}

impl Hash for Route {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Route {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Route {
    // Segment-wise so that a parent always sorts before its children.
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.iter().cmp(other.segments.iter())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route({:?})", self.as_str())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Route::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(raw: &str) -> Route {
        Route::parse(raw).unwrap()
    }

    #[test]
    fn test_parse_normalizes_separators() {
        assert_eq!(route("/docs//intro/").as_str(), "docs/intro");
        assert_eq!(route("docs\\intro").as_str(), "docs/intro");
        assert_eq!(route("./docs/ ./intro").as_str(), "docs/intro");
        assert_eq!(route(" docs / intro ").as_str(), "docs/intro");
    }

    #[test]
    fn test_parse_folds_case() {
        assert_eq!(route("Docs/INTRO"), route("docs/intro"));
    }

    #[test]
    fn test_parse_root() {
        for raw in ["", "/", "///", "."] {
            let r = route(raw);
            assert!(r.is_root());
            assert_eq!(r.level(), 0);
            assert_eq!(r.as_str(), "");
        }
    }

    #[test]
    fn test_parse_rejects_control_and_traversal() {
        assert!(Route::parse("docs\0intro").is_err());
        assert!(Route::parse("docs\nintro").is_err());
        assert!(Route::parse("docs/../etc").is_err());
    }

    #[test]
    fn test_parse_keeps_percent_sequences() {
        assert_eq!(route("a%20b").as_str(), "a%20b");
    }

    #[test]
    fn test_url_path_round_trips_reserved_characters() {
        for raw in ["docs/notes#1.txt", "docs/faq?.txt", "docs/100%41.txt", "my intro/ünïcode"] {
            let r = route(raw);
            let url = r.to_url_path();
            assert!(!url.contains(['#', '?', ' ']), "{url}");
            assert_eq!(Route::from_request_path(&url).unwrap(), r);
        }
        assert_eq!(Route::root().to_url_path(), "/");
        assert_eq!(route("docs/faq?.txt").to_url_path(), "/docs/faq%3F.txt");
    }

    #[test]
    fn test_from_request_path() {
        let r = Route::from_request_path("/Docs/My%20Intro/?print=1#top").unwrap();
        assert_eq!(r.as_str(), "docs/my intro");
        assert!(Route::from_request_path("/a%ff").is_err());
        assert!(Route::from_request_path("/a%00b").is_err());
    }

    #[test]
    fn test_is_child_of_is_strict() {
        let root = Route::root();
        let docs = route("docs");
        let intro = route("docs/intro");

        assert!(intro.is_child_of(&docs));
        assert!(intro.is_child_of(&root));
        assert!(docs.is_child_of(&root));
        assert!(!docs.is_child_of(&intro));
        assert!(!docs.is_child_of(&docs));
        assert!(!root.is_child_of(&root));
        assert!(!route("docsx/intro").is_child_of(&docs));
    }

    #[test]
    fn test_parent_and_level() {
        let intro = route("docs/intro");
        assert_eq!(intro.level(), 2);
        assert_eq!(intro.parent(), Some(route("docs")));
        assert_eq!(route("docs").parent(), Some(Route::root()));
        assert_eq!(Route::root().parent(), None);
    }

    #[test]
    fn test_ancestors_deepest_first() {
        let ancestors: Vec<_> = route("a/b/c").ancestors().collect();
        assert_eq!(ancestors, vec![route("a/b"), route("a"), Route::root()]);
        assert_eq!(Route::root().ancestors().count(), 0);
    }

    #[test]
    fn test_join_and_strip_prefix() {
        let item = route("docs/intro");
        let file = item.join("files/Diagram.png").unwrap();
        assert_eq!(file.as_str(), "docs/intro/files/diagram.png");
        assert_eq!(file.strip_prefix(&item), Some(route("files/diagram.png")));
        assert_eq!(item.strip_prefix(&item), Some(Route::root()));
        assert_eq!(route("other").strip_prefix(&item), None);
    }

    #[test]
    fn test_ordering_puts_parents_first() {
        let mut routes = vec![route("b"), route("a/b"), route("a"), Route::root()];
        routes.sort();
        assert_eq!(routes, vec![Route::root(), route("a"), route("a/b"), route("b")]);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&route("Docs/Intro")).unwrap();
        assert_eq!(json, "\"docs/intro\"");
        let back: Route = serde_json::from_str("\"/docs/intro/\"").unwrap();
        assert_eq!(back, route("docs/intro"));
    }
}
