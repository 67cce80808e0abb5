//! Mutation operations on the state tree.
//!
//! Each operation describes a single change at one path. Synthesized
//! mutations build an `Op` and hand it to [`apply_op`](crate::apply_op).

use crate::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single state mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Set a value at the path.
    ///
    /// Creates intermediate objects if they don't exist.
    Set {
        /// Target path.
        path: Path,
        /// Value to set.
        value: Value,
    },

    /// Delete the value at the path.
    ///
    /// No-op if the path doesn't exist.
    Delete {
        /// Target path.
        path: Path,
    },

    /// Append a value to the array at the path.
    ///
    /// Creates the array if it doesn't exist.
    Push {
        /// Target path (must be an array or non-existent).
        path: Path,
        /// Value to append.
        value: Value,
    },

    /// Remove the last element of the array at the path.
    Pop {
        /// Target path (must be an array or non-existent).
        path: Path,
    },

    /// Remove `delete_count` elements at `index`, then insert `value` there.
    Splice {
        /// Target path (must be an array or non-existent).
        path: Path,
        /// Start index, clamped to the array length.
        index: usize,
        /// Number of elements to remove, clamped to what is available.
        delete_count: usize,
        /// Element to insert, if any.
        value: Option<Value>,
    },
}

impl Op {
    /// Create a Set operation.
    #[inline]
    pub fn set(path: Path, value: impl Into<Value>) -> Self {
        Op::Set {
            path,
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    #[inline]
    pub fn delete(path: Path) -> Self {
        Op::Delete { path }
    }

    /// Create a Push operation.
    #[inline]
    pub fn push(path: Path, value: impl Into<Value>) -> Self {
        Op::Push {
            path,
            value: value.into(),
        }
    }

    /// Create a Pop operation.
    #[inline]
    pub fn pop(path: Path) -> Self {
        Op::Pop { path }
    }

    /// Create a Splice operation.
    #[inline]
    pub fn splice(path: Path, index: usize, delete_count: usize, value: Option<Value>) -> Self {
        Op::Splice {
            path,
            index,
            delete_count,
            value,
        }
    }
}

/// Payload accepted by the `splice` mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplicePayload {
    /// Element to insert, if any.
    #[serde(default)]
    pub value: Option<Value>,
    /// Start index.
    pub index: usize,
    /// Number of elements to remove (defaults to 0).
    #[serde(default)]
    pub delete_count: Option<usize>,
}

impl SplicePayload {
    /// Convert into a splice operation at `path`.
    pub fn into_op(self, path: Path) -> Op {
        Op::splice(path, self.index, self.delete_count.unwrap_or(0), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn test_op_constructors() {
        assert_eq!(
            Op::set(path!("a"), json!(1)),
            Op::Set {
                path: path!("a"),
                value: json!(1)
            }
        );
        assert!(matches!(Op::delete(path!("b")), Op::Delete { path } if path == path!("b")));
        assert!(matches!(Op::push(path!("c"), 1), Op::Push { value, .. } if value == json!(1)));
        assert!(matches!(Op::pop(path!("c")), Op::Pop { .. }));
        assert!(matches!(
            Op::splice(path!("c"), 0, 1, None),
            Op::Splice { index: 0, delete_count: 1, value: None, .. }
        ));
    }

    #[test]
    fn test_op_wire_format() {
        let op = Op::push(path!("user", "tags"), json!("admin"));
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            json!({"op": "push", "path": ["user", "tags"], "value": "admin"})
        );
        let parsed: Op = serde_json::from_value(json).unwrap();
        assert_eq!(op, parsed);
    }

    #[test]
    fn test_splice_payload_into_op() {
        let payload = SplicePayload {
            value: Some(json!("x")),
            index: 2,
            delete_count: None,
        };
        assert_eq!(
            payload.into_op(path!("list")),
            Op::splice(path!("list"), 2, 0, Some(json!("x")))
        );
    }
}
