//! Raw mutation synthesis.
//!
//! Walks an initial state shape and produces one primitive per reachable key.
//! [`default_mutations`] emits the classic set:
//!
//! - `SET_<PATH>` for every key,
//! - `POP_<PATH>`, `PUSH_<PATH>`, `SPLICE_<PATH>` for arrays.
//!
//! [`default_mutations_with`] follows the configured pattern and adds the
//! collection primitives the resolver routes wildcard writes and deletes to.

use crate::naming::{raw_pop_name, raw_push_name, raw_set_name, raw_splice_name};
use crate::path::WILDCARD;
use crate::shape::{payload_id, Shape};
use crate::store::MutationFn;
use crate::{
    append_at, delete_at, pop_at, set_at, AccessConfig, AccessError, Path, Pattern, SplicePayload,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mutations keyed by local name.
pub type MutationMap = BTreeMap<String, MutationFn>;

/// Traditional `SET_`/`POP_`/`PUSH_`/`SPLICE_` primitives for every key of
/// `initial`.
///
/// Nothing is skipped and nothing is checked for conflicts.
///
/// ```
/// use easy_access::default_mutations;
/// use serde_json::json;
///
/// let muts = default_mutations(&json!({"user": {"name": "x"}, "tags": []}));
/// let names: Vec<_> = muts.keys().map(String::as_str).collect();
/// assert_eq!(
///     names,
///     ["POP_TAGS", "PUSH_TAGS", "SET_TAGS", "SET_USER", "SET_USER.NAME", "SPLICE_TAGS"]
/// );
/// ```
pub fn default_mutations(initial: &Value) -> MutationMap {
    let mut out = MutationMap::new();
    walk(initial, "", &mut |path: &str, shape: Shape| {
        let names = Names::traditional(path);
        out.insert(names.set.clone(), set_mutation(path));
        if shape == Shape::Sequence {
            add_sequence(&mut out, path, &names);
        }
    });
    out
}

/// Mutations for `initial` under the configured naming pattern.
///
/// On top of the per-key setters and array primitives, every collection
/// (empty-object) leaf gets a wildcard setter and two deleters:
///
/// | role            | flat      | traditional    |
/// |-----------------|-----------|----------------|
/// | set             | `p`       | `SET_P`        |
/// | push/pop/splice | `p.push`… | `PUSH_P`…      |
/// | wildcard set    | `p.*`     | `SET_P.*`      |
/// | delete by id    | `-p`      | `DELETE_P`     |
/// | wildcard delete | `-p.*`    | `DELETE_P.*`   |
pub fn default_mutations_with(initial: &Value, config: &AccessConfig) -> MutationMap {
    let mut out = MutationMap::new();
    walk(initial, "", &mut |path: &str, shape: Shape| {
        let names = match config.pattern {
            Pattern::Flat => Names::flat(path),
            Pattern::Traditional => Names::traditional(path),
        };
        out.insert(names.set.clone(), set_mutation(path));
        match shape {
            Shape::Sequence => add_sequence(&mut out, path, &names),
            Shape::Mapping { empty: true } => {
                out.insert(names.wildcard_set.clone(), wildcard_set_mutation(path));
                out.insert(names.delete.clone(), delete_mutation(path, &names.delete));
                out.insert(
                    names.wildcard_delete.clone(),
                    delete_mutation(path, &names.wildcard_delete),
                );
            }
            _ => {}
        }
    });
    out
}

/// Generated names for one dot path.
struct Names {
    set: String,
    push: String,
    pop: String,
    splice: String,
    wildcard_set: String,
    delete: String,
    wildcard_delete: String,
}

impl Names {
    fn traditional(path: &str) -> Self {
        let upper = path.to_uppercase();
        Self {
            set: raw_set_name(path),
            push: raw_push_name(path),
            pop: raw_pop_name(path),
            splice: raw_splice_name(path),
            wildcard_set: format!("SET_{upper}.{WILDCARD}"),
            delete: format!("DELETE_{upper}"),
            wildcard_delete: format!("DELETE_{upper}.{WILDCARD}"),
        }
    }

    fn flat(path: &str) -> Self {
        Self {
            set: path.to_string(),
            push: format!("{path}.push"),
            pop: format!("{path}.pop"),
            splice: format!("{path}.splice"),
            wildcard_set: format!("{path}.{WILDCARD}"),
            delete: format!("-{path}"),
            wildcard_delete: format!("-{path}.{WILDCARD}"),
        }
    }
}

fn walk(value: &Value, prefix: &str, visit: &mut impl FnMut(&str, Shape)) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, child) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let shape = Shape::of(child);
        visit(&path, shape);
        if let Shape::Mapping { .. } = shape {
            walk(child, &path, visit);
        }
    }
}

fn add_sequence(out: &mut MutationMap, path: &str, names: &Names) {
    out.insert(names.pop.clone(), pop_mutation(path));
    out.insert(names.push.clone(), push_mutation(path));
    out.insert(names.splice.clone(), splice_mutation(path));
}

fn set_mutation(path: &str) -> MutationFn {
    let path = Path::from_dotted(path);
    Arc::new(move |state: &mut Value, payload: Value| {
        set_at(state, &path, payload).map(|_| ())
    })
}

fn push_mutation(path: &str) -> MutationFn {
    let path = Path::from_dotted(path);
    Arc::new(move |state: &mut Value, payload: Value| {
        append_at(state, &path, payload).map(|_| ())
    })
}

fn pop_mutation(path: &str) -> MutationFn {
    let path = Path::from_dotted(path);
    Arc::new(move |state: &mut Value, _payload: Value| pop_at(state, &path).map(|_| ()))
}

fn splice_mutation(path: &str) -> MutationFn {
    let path = Path::from_dotted(path);
    Arc::new(move |state: &mut Value, payload: Value| {
        let splice: SplicePayload = serde_json::from_value(payload)?;
        crate::apply_op(state, &splice.into_op(path.clone()))
    })
}

/// Store the payload under its id, or merge an id-less object payload.
fn wildcard_set_mutation(path: &str) -> MutationFn {
    let name = format!("{path}.{WILDCARD}");
    let path = Path::from_dotted(path);
    Arc::new(move |state: &mut Value, payload: Value| {
        if let Some(id) = payload_id(&payload) {
            return set_at(state, &path.clone().key(id), payload).map(|_| ());
        }
        let Value::Object(entries) = payload else {
            return Err(AccessError::handler(
                &name,
                "wildcard set needs a payload with an id or an object of entries",
            ));
        };
        for (key, value) in entries {
            set_at(state, &path.clone().key(key), value)?;
        }
        Ok(())
    })
}

/// Remove the child of the collection named by the payload's id.
fn delete_mutation(path: &str, name: &str) -> MutationFn {
    let name = name.to_owned();
    let path = Path::from_dotted(path);
    Arc::new(move |state: &mut Value, payload: Value| {
        let id = match &payload {
            Value::String(id) if !id.is_empty() => id.clone(),
            other => payload_id(other).ok_or_else(|| {
                AccessError::handler(&name, "delete needs an id or a payload carrying one")
            })?,
        };
        delete_at(state, &path.clone().key(id));
        Ok(())
    })
}
