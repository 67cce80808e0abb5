//! Path representation for addressing values inside the state tree.
//!
//! Two separators are in play. `/` splits *module* boundaries and `.` splits
//! *property* boundaries inside a module's state. A [`Path`] is the
//! property-level sequence of keys; an [`AccessPath`] is the module/props split
//! of a full access string such as `info/user/favColours.primary`.

use crate::error::{AccessError, AccessResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment that stands for "the entry identified by the payload's id".
pub const WILDCARD: &str = "*";

/// Separator between property segments.
pub const PROP_SEPARATOR: char = '.';

/// Separator between module segments.
pub const MODULE_SEPARATOR: char = '/';

/// A sequence of keys into a JSON structure.
///
/// Segments are opaque strings. A segment is only read as an array index when
/// it is resolved against an array.
///
/// # Examples
///
/// ```
/// use easy_access::Path;
///
/// let path = Path::root().key("users").key("0").key("name");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "users.0.name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty path (alias for `new`).
    #[inline]
    pub fn root() -> Self {
        Self::new()
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse a dot-separated property path.
    ///
    /// `""` is the root. Empty segments, including a leading or trailing
    /// dot, are rejected.
    ///
    /// ```
    /// use easy_access::Path;
    ///
    /// assert_eq!(Path::parse("a.b.c").unwrap().len(), 3);
    /// assert!(Path::parse("").unwrap().is_empty());
    /// assert!(Path::parse("a.").is_err());
    /// ```
    pub fn parse(path: &str) -> AccessResult<Self> {
        Self::parse_with(path, &[PROP_SEPARATOR])
    }

    /// Parse a path where both `/` and `.` separate segments.
    ///
    /// Used for reads that address the single merged state tree, where a
    /// module boundary is just another level of nesting.
    pub fn parse_state_path(path: &str) -> AccessResult<Self> {
        Self::parse_with(path, &[MODULE_SEPARATOR, PROP_SEPARATOR])
    }

    /// Split an already validated dot path without checking its segments.
    ///
    /// `""` is the root.
    pub(crate) fn from_dotted(path: &str) -> Self {
        if path.is_empty() {
            Self::root()
        } else {
            path.split(PROP_SEPARATOR).map(str::to_owned).collect()
        }
    }

    fn parse_with(path: &str, separators: &[char]) -> AccessResult<Self> {
        if path.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for segment in path.split(separators) {
            if segment.is_empty() {
                let reason = if path.ends_with(separators) {
                    "trailing separator"
                } else {
                    "empty segment"
                };
                return Err(AccessError::invalid_path(path, reason));
            }
            segments.push(segment.to_owned());
        }
        Ok(Self(segments))
    }

    /// Append a key segment and return self (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(k.into());
        self
    }

    /// Push a key segment onto the path (mutating).
    #[inline]
    pub fn push_key(&mut self, k: impl Into<String>) {
        self.0.push(k.into());
    }

    /// Get the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the last segment.
    #[inline]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Get the parent path (path without the last segment).
    #[inline]
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Render the path up to (and including) segment `end`.
    pub(crate) fn display_prefix(&self, end: usize) -> String {
        self.0[..=end.min(self.0.len().saturating_sub(1))].join(".")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl FromIterator<String> for Path {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

/// Construct a `Path` from a sequence of segments.
///
/// Every argument is converted with `to_string()`, so numbers become index
/// lookalike keys.
///
/// ```
/// use easy_access::path;
///
/// let p = path!("items", 0, "name");
/// assert_eq!(p.to_string(), "items.0.name");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push_key(($seg).to_string());
        )+
        p
    }};
}

/// A full access string split at its last module separator.
///
/// `info/user/favColours.primary` splits into module path `info/user/` and
/// props `favColours.primary`. A path without `/` has module path `""`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessPath {
    module_path: String,
    props: String,
}

impl AccessPath {
    /// Split and validate an access string.
    ///
    /// Module segments must be non-empty. The props may be empty (addressing
    /// the module's whole state), otherwise they must be a valid dot path.
    pub fn parse(path: &str) -> AccessResult<Self> {
        let (module_path, props) = match path.rfind(MODULE_SEPARATOR) {
            Some(idx) => (&path[..=idx], &path[idx + 1..]),
            None => ("", path),
        };
        if !module_path.is_empty()
            && module_path[..module_path.len() - 1]
                .split(MODULE_SEPARATOR)
                .any(str::is_empty)
        {
            return Err(AccessError::invalid_path(path, "empty module segment"));
        }
        Path::parse(props).map_err(|err| match err {
            AccessError::InvalidPath { reason, .. } => AccessError::invalid_path(path, reason),
            other => other,
        })?;
        Ok(Self {
            module_path: module_path.to_owned(),
            props: props.to_owned(),
        })
    }

    /// Module namespace including its trailing `/`, or `""` for the root.
    #[inline]
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Dot-separated property path inside the module.
    #[inline]
    pub fn props(&self) -> &str {
        &self.props
    }

    /// The props as a parsed [`Path`].
    pub fn prop_path(&self) -> Path {
        Path::from_dotted(&self.props)
    }

    /// Join a handler name onto the module namespace.
    #[inline]
    pub fn in_module(&self, name: &str) -> String {
        format!("{}{}", self.module_path, name)
    }
}

/// Split a namespace such as `info/user/set` into its module segments.
///
/// Trailing and doubled separators are ignored.
pub fn namespace_segments(namespace: &str) -> Vec<String> {
    namespace
        .split(MODULE_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Normalize module segments into a namespace string ending in `/`.
pub fn namespace_of(segments: &[String]) -> String {
    if segments.is_empty() {
        String::new()
    } else {
        format!("{}/", segments.join("/"))
    }
}
