//! Structural classification of state values.

use serde_json::Value;

/// The closed set of shapes a state value can take.
///
/// Every recursive walk over state matches on this instead of probing the
/// value ad hoc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Anything that is not a container: null, bool, number, string.
    Scalar,
    /// A JSON object. `empty` marks the placeholder used for collections.
    Mapping {
        /// The object has no keys.
        empty: bool,
    },
    /// A JSON array.
    Sequence,
}

impl Shape {
    /// Classify a value.
    #[inline]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(map) => Shape::Mapping {
                empty: map.is_empty(),
            },
            Value::Array(_) => Shape::Sequence,
            _ => Shape::Scalar,
        }
    }

    /// Non-empty object that a walk should descend into.
    #[inline]
    pub fn is_branch(self) -> bool {
        matches!(self, Shape::Mapping { empty: false })
    }

    /// Empty object standing in for a dynamically keyed collection.
    #[inline]
    pub fn is_collection(self) -> bool {
        matches!(self, Shape::Mapping { empty: true })
    }
}

/// Extract the id carried by a payload, the way wildcard paths consume it.
///
/// Only a truthy id counts: strings must be non-empty, numbers non-zero.
/// Numbers are rendered as their JSON text.
pub fn payload_id(payload: &Value) -> Option<String> {
    match payload.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_of() {
        assert_eq!(Shape::of(&json!(1)), Shape::Scalar);
        assert_eq!(Shape::of(&json!(null)), Shape::Scalar);
        assert_eq!(Shape::of(&json!({})), Shape::Mapping { empty: true });
        assert_eq!(Shape::of(&json!({"a": 1})), Shape::Mapping { empty: false });
        assert_eq!(Shape::of(&json!([])), Shape::Sequence);
    }

    #[test]
    fn test_branch_and_collection() {
        assert!(Shape::of(&json!({"a": 1})).is_branch());
        assert!(!Shape::of(&json!({})).is_branch());
        assert!(Shape::of(&json!({})).is_collection());
        assert!(!Shape::of(&json!([])).is_collection());
    }

    #[test]
    fn test_payload_id() {
        assert_eq!(payload_id(&json!({"id": "42"})), Some("42".into()));
        assert_eq!(payload_id(&json!({"id": 7})), Some("7".into()));
        assert_eq!(payload_id(&json!({"id": ""})), None);
        assert_eq!(payload_id(&json!({"id": null})), None);
        assert_eq!(payload_id(&json!({"name": "x"})), None);
        assert_eq!(payload_id(&json!("42")), None);
    }

    #[test]
    fn test_payload_id_zero_is_missing() {
        assert_eq!(payload_id(&json!({"id": 0})), None);
        assert_eq!(payload_id(&json!({"id": 0.0})), None);
        assert_eq!(payload_id(&json!({"id": "0"})), Some("0".into()));
    }
}
