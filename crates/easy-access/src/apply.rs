//! Deep-path reads and writes on the state tree.
//!
//! Reads never fail: a miss anywhere along the path is `None`. Writes validate
//! the whole path against the current tree before touching it, so a write that
//! fails leaves the tree exactly as it was.

use crate::{
    error::{value_type_name, AccessError, AccessResult},
    Op, Path,
};
use serde_json::{Map, Value};

/// Get a reference to the value at a path.
///
/// The root path returns the container itself.
///
/// ```
/// use easy_access::{get_at, path};
/// use serde_json::json;
///
/// let doc = json!({"a": {"list": [10, 20]}});
/// assert_eq!(get_at(&doc, &path!("a", "list", 1)), Some(&json!(20)));
/// assert_eq!(get_at(&doc, &path!("a", "missing")), None);
/// ```
pub fn get_at<'a>(doc: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = doc;
    for seg in path.iter() {
        current = match current {
            Value::Object(map) => map.get(seg)?,
            Value::Array(arr) => arr.get(parse_index(seg)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Get a mutable reference to the value at a path.
pub fn get_at_mut<'a>(doc: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    let mut current = doc;
    for seg in path.iter() {
        current = match current {
            Value::Object(map) => map.get_mut(seg)?,
            Value::Array(arr) => arr.get_mut(parse_index(seg)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set a value at a path, creating intermediate objects as needed.
///
/// Returns the root for chaining.
///
/// ```
/// use easy_access::{set_at, path};
/// use serde_json::json;
///
/// let mut doc = json!({});
/// set_at(&mut doc, &path!("a", "b", "c"), json!(42)).unwrap();
/// assert_eq!(doc, json!({"a": {"b": {"c": 42}}}));
/// ```
pub fn set_at<'a>(doc: &'a mut Value, path: &Path, value: Value) -> AccessResult<&'a mut Value> {
    check_writable(doc, path)?;
    *slot_at(doc, path)? = value;
    Ok(doc)
}

/// Remove and return the value at a path. No-op on a miss.
pub fn delete_at(doc: &mut Value, path: &Path) -> Option<Value> {
    let Some(parent_path) = path.parent() else {
        return Some(std::mem::take(doc));
    };
    let last = path.last()?;
    match get_at_mut(doc, &parent_path)? {
        Value::Object(map) => map.remove(last),
        Value::Array(arr) => {
            let idx = parse_index(last)?;
            (idx < arr.len()).then(|| arr.remove(idx))
        }
        _ => None,
    }
}

/// Append a value to the array at a path, creating the array if absent.
///
/// Returns the new length.
pub fn append_at(doc: &mut Value, path: &Path, value: Value) -> AccessResult<usize> {
    let arr = array_at(doc, path)?;
    arr.push(value);
    Ok(arr.len())
}

/// Remove and return the last element of the array at a path.
///
/// An absent array is created empty, and `None` is returned.
pub fn pop_at(doc: &mut Value, path: &Path) -> AccessResult<Option<Value>> {
    Ok(array_at(doc, path)?.pop())
}

/// Splice the array at a path, creating it if absent.
///
/// `index` and `delete_count` are clamped to the array bounds. Returns the
/// removed elements.
///
/// ```
/// use easy_access::{splice_at, path};
/// use serde_json::json;
///
/// let mut doc = json!({"list": [1, 2, 3]});
/// let removed = splice_at(&mut doc, &path!("list"), Some(json!(9)), 1, 1).unwrap();
/// assert_eq!(removed, vec![json!(2)]);
/// assert_eq!(doc["list"], json!([1, 9, 3]));
/// ```
pub fn splice_at(
    doc: &mut Value,
    path: &Path,
    value: Option<Value>,
    index: usize,
    delete_count: usize,
) -> AccessResult<Vec<Value>> {
    let arr = array_at(doc, path)?;
    let start = index.min(arr.len());
    let end = start.saturating_add(delete_count).min(arr.len());
    Ok(arr.splice(start..end, value).collect())
}

/// Apply a single operation to a document in place.
pub fn apply_op(doc: &mut Value, op: &Op) -> AccessResult<()> {
    match op {
        Op::Set { path, value } => set_at(doc, path, value.clone()).map(|_| ()),
        Op::Delete { path } => {
            delete_at(doc, path);
            Ok(())
        }
        Op::Push { path, value } => append_at(doc, path, value.clone()).map(|_| ()),
        Op::Pop { path } => pop_at(doc, path).map(|_| ()),
        Op::Splice {
            path,
            index,
            delete_count,
            value,
        } => splice_at(doc, path, value.clone(), *index, *delete_count).map(|_| ()),
    }
}

/// Apply a batch of operations to a copy of `doc` (pure function).
///
/// Either every operation applies or the error is returned and `doc` is
/// untouched.
pub fn apply_ops<'a>(doc: &Value, ops: impl IntoIterator<Item = &'a Op>) -> AccessResult<Value> {
    let mut result = doc.clone();
    for op in ops {
        apply_op(&mut result, op)?;
    }
    Ok(result)
}

/// Resolve the array at `path`, creating an empty one if nothing is there.
fn array_at<'a>(doc: &'a mut Value, path: &Path) -> AccessResult<&'a mut Vec<Value>> {
    check_writable(doc, path)?;
    let slot = slot_at(doc, path)?;
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(arr) => Ok(arr),
        other => Err(AccessError::type_mismatch(
            path.to_string(),
            "array",
            value_type_name(other),
        )),
    }
}

/// Walk the existing part of `path` and report anything a write would trip on.
///
/// Nothing is mutated. Once this returns `Ok`, `slot_at` cannot fail.
fn check_writable(doc: &Value, path: &Path) -> AccessResult<()> {
    let mut current = doc;
    for (depth, seg) in path.iter().enumerate() {
        current = match current {
            Value::Null => return Ok(()),
            Value::Object(map) => match map.get(seg) {
                Some(child) => child,
                None => return Ok(()),
            },
            Value::Array(arr) => {
                let idx = parse_index(seg).ok_or_else(|| {
                    AccessError::type_mismatch(path.display_prefix(depth), "object", "array")
                })?;
                arr.get(idx).ok_or_else(|| {
                    AccessError::index_out_of_bounds(path.display_prefix(depth), idx, arr.len())
                })?
            }
            other => {
                return Err(AccessError::type_mismatch(
                    path.display_prefix(depth),
                    "object",
                    value_type_name(other),
                ))
            }
        };
    }
    Ok(())
}

/// Mutable slot at `path`, creating objects for missing intermediates.
///
/// A missing final key is inserted as `null`.
fn slot_at<'a>(doc: &'a mut Value, path: &Path) -> AccessResult<&'a mut Value> {
    let mut current = doc;
    for (depth, seg) in path.iter().enumerate() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map.entry(seg.to_owned()).or_insert(Value::Null),
            Value::Array(arr) => {
                let len = arr.len();
                let idx = parse_index(seg).ok_or_else(|| {
                    AccessError::type_mismatch(path.display_prefix(depth), "object", "array")
                })?;
                arr.get_mut(idx).ok_or_else(|| {
                    AccessError::index_out_of_bounds(path.display_prefix(depth), idx, len)
                })?
            }
            other => {
                return Err(AccessError::type_mismatch(
                    path.display_prefix(depth),
                    "object",
                    value_type_name(other),
                ))
            }
        };
    }
    Ok(current)
}

/// Read a segment as an array index. Only plain decimal digits qualify.
fn parse_index(seg: &str) -> Option<usize> {
    if seg.is_empty() || !seg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    seg.parse().ok()
}
