//! Setter and deleter bundle synthesis.
//!
//! For every module (and the root) a walk over the current state produces two
//! handler-only modules registered next to it: `<ns>set/` with one setter per
//! reachable key, and `<ns>delete/` with deleters for collection leaves.
//! Handler names are the relative dot path, so `info/user/set/favColours.primary`
//! routes to `set("info/user/favColours.primary", ..)`.

use crate::access::{delete, set};
use crate::path::{namespace_segments, WILDCARD};
use crate::shape::Shape;
use crate::store::{ActionFn, GetterFn, ModuleDefinition, StateContainer};
use crate::{get_at, AccessConfig, AccessResult, Outcome, Path};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// One key reached by the synthesis walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    /// Dot path relative to the module, e.g. `user.tags`.
    pub relative: String,
    /// Namespace plus relative path, e.g. `info/user.tags`.
    pub full: String,
    /// Shape of the value found there.
    pub shape: Shape,
}

/// Enumerate every key synthesis should generate handlers for.
///
/// Private keys, ignored paths and keys that are modules of their own are
/// skipped together with everything below them. Non-empty objects are
/// descended into; arrays are leaves.
pub fn walk_leaves(
    state: &Value,
    namespace: &str,
    known_namespaces: &BTreeSet<String>,
    config: &AccessConfig,
) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    collect_leaves(state, namespace, "", known_namespaces, config, &mut leaves);
    leaves
}

fn collect_leaves(
    value: &Value,
    namespace: &str,
    prefix: &str,
    known_namespaces: &BTreeSet<String>,
    config: &AccessConfig,
    out: &mut Vec<Leaf>,
) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, child) in map {
        let relative = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let full = format!("{namespace}{relative}");
        if config.skips(key, &full) || known_namespaces.contains(&format!("{full}/")) {
            continue;
        }
        let shape = Shape::of(child);
        out.push(Leaf {
            relative: relative.clone(),
            full,
            shape,
        });
        if shape.is_branch() {
            collect_leaves(child, namespace, &relative, known_namespaces, config, out);
        }
    }
}

/// Setter actions for a module's state, keyed by relative path.
///
/// Every leaf gets a setter; collection leaves also get `<path>.*`.
pub fn setter_actions(
    state: &Value,
    namespace: &str,
    known_namespaces: &BTreeSet<String>,
    config: &AccessConfig,
) -> BTreeMap<String, ActionFn> {
    let config = Arc::new(config.clone());
    let mut actions = BTreeMap::new();
    for leaf in walk_leaves(state, namespace, known_namespaces, &config) {
        actions.insert(leaf.relative.clone(), setter(&leaf.full, &config));
        if leaf.shape.is_collection() {
            actions.insert(
                format!("{}.{WILDCARD}", leaf.relative),
                setter(&format!("{}.{WILDCARD}", leaf.full), &config),
            );
        }
    }
    actions
}

/// Deleter actions for a module's state, keyed by relative path.
///
/// Only collection leaves get deleters: `<path>` and `<path>.*`.
pub fn deleter_actions(
    state: &Value,
    namespace: &str,
    known_namespaces: &BTreeSet<String>,
    config: &AccessConfig,
) -> BTreeMap<String, ActionFn> {
    let config = Arc::new(config.clone());
    let mut actions = BTreeMap::new();
    for leaf in walk_leaves(state, namespace, known_namespaces, &config) {
        if !leaf.shape.is_collection() {
            continue;
        }
        actions.insert(leaf.relative.clone(), deleter(&leaf.full, &config));
        actions.insert(
            format!("{}.{WILDCARD}", leaf.relative),
            deleter(&format!("{}.{WILDCARD}", leaf.full), &config),
        );
    }
    actions
}

/// Read accessors for a module's state, keyed by relative path.
///
/// Each getter reads its leaf from the module-local state it is handed.
pub fn getter_map(
    state: &Value,
    namespace: &str,
    known_namespaces: &BTreeSet<String>,
    config: &AccessConfig,
) -> BTreeMap<String, GetterFn> {
    walk_leaves(state, namespace, known_namespaces, config)
        .into_iter()
        .map(|leaf| {
            let path = Path::from_dotted(&leaf.relative);
            let getter: GetterFn = Arc::new(move |local: &Value| {
                get_at(local, &path).cloned().unwrap_or(Value::Null)
            });
            (leaf.relative, getter)
        })
        .collect()
}

/// The setter bundle module for one namespace.
pub fn setter_module(
    state: &Value,
    namespace: &str,
    known_namespaces: &BTreeSet<String>,
    config: &AccessConfig,
) -> ModuleDefinition {
    ModuleDefinition {
        actions: setter_actions(state, namespace, known_namespaces, config),
        ..ModuleDefinition::new()
    }
}

/// The deleter bundle module for one namespace.
pub fn deleter_module(
    state: &Value,
    namespace: &str,
    known_namespaces: &BTreeSet<String>,
    config: &AccessConfig,
) -> ModuleDefinition {
    ModuleDefinition {
        actions: deleter_actions(state, namespace, known_namespaces, config),
        ..ModuleDefinition::new()
    }
}

/// Build and register setter and deleter bundles for every module with state,
/// then for the root.
///
/// Running it again re-derives every bundle from the current state and
/// replaces the bundles registered before. Actions the host already declared
/// at a bundle path are never replaced. Returns the number of bundle
/// modules registered.
pub fn generate_accessor_modules<S: StateContainer + ?Sized>(
    store: &mut S,
    config: &AccessConfig,
) -> AccessResult<usize> {
    let known: BTreeSet<String> = store.module_namespaces().into_iter().collect();

    let mut bundles = Vec::new();
    for namespace in &known {
        let Some(state) = store.module_state(namespace) else {
            continue;
        };
        bundles.push(bundle_pair(state, namespace, &known, config));
    }
    bundles.push(bundle_pair(store.state(), "", &known, config));

    let mut registered = 0;
    for ((setter_name, setters), (deleter_name, deleters)) in bundles {
        store.register_bundle(&setter_name, setters)?;
        store.register_bundle(&deleter_name, deleters)?;
        registered += 2;
    }
    tracing::debug!(modules = known.len(), bundles = registered, "generated accessor modules");
    Ok(registered)
}

type Bundle = (Vec<String>, ModuleDefinition);

fn bundle_pair(
    state: &Value,
    namespace: &str,
    known: &BTreeSet<String>,
    config: &AccessConfig,
) -> (Bundle, Bundle) {
    let setter_name = namespace_segments(&format!("{namespace}{}", config.setter_namespace));
    let deleter_name = namespace_segments(&format!("{namespace}{}", config.deleter_namespace));
    (
        (setter_name, setter_module(state, namespace, known, config)),
        (deleter_name, deleter_module(state, namespace, known, config)),
    )
}

fn setter(full_path: &str, config: &Arc<AccessConfig>) -> ActionFn {
    let full_path = full_path.to_owned();
    let config = Arc::clone(config);
    Arc::new(move |store: &mut dyn StateContainer, payload: Value| {
        set(store, &full_path, payload, &config).map(Outcome::into_value)
    })
}

fn deleter(full_path: &str, config: &Arc<AccessConfig>) -> ActionFn {
    let full_path = full_path.to_owned();
    let config = Arc::clone(config);
    Arc::new(move |store: &mut dyn StateContainer, payload: Value| {
        let payload = (!payload.is_null()).then_some(payload);
        delete(store, &full_path, payload, &config).map(Outcome::into_value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(actions: &BTreeMap<String, ActionFn>) -> Vec<&str> {
        actions.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_setter_and_deleter_names() {
        let state = json!({"user": {"name": "x", "tags": {}}});
        let conf = AccessConfig::default();
        let setters = setter_actions(&state, "", &BTreeSet::new(), &conf);
        assert_eq!(
            names(&setters),
            vec!["user", "user.name", "user.tags", "user.tags.*"]
        );
        let deleters = deleter_actions(&state, "", &BTreeSet::new(), &conf);
        assert_eq!(names(&deleters), vec!["user.tags", "user.tags.*"]);
    }

    #[test]
    fn test_walk_skips_private_ignored_and_modules() {
        let state = json!({
            "_secret": 1,
            "hidden": {"deep": 1},
            "sub": {"x": 1},
            "shown": [1, 2]
        });
        let known: BTreeSet<String> = ["info/sub/".to_string()].into();
        let conf = AccessConfig::default().with_ignored_prop("info/hidden");
        let leaves = walk_leaves(&state, "info/", &known, &conf);
        let full: Vec<_> = leaves.iter().map(|l| l.full.as_str()).collect();
        assert_eq!(full, vec!["info/shown"]);
        assert_eq!(leaves[0].shape, Shape::Sequence);
    }

    #[test]
    fn test_private_props_kept_when_allowed() {
        let state = json!({"_secret": 1});
        let conf = AccessConfig::default().with_ignore_private_props(false);
        let leaves = walk_leaves(&state, "", &BTreeSet::new(), &conf);
        assert_eq!(leaves.len(), 1);
    }

    #[test]
    fn test_walk_non_object_state_is_empty() {
        let leaves = walk_leaves(&json!([1, 2]), "", &BTreeSet::new(), &AccessConfig::default());
        assert!(leaves.is_empty());
    }

    #[test]
    fn test_getter_map_reads_local_state() {
        let state = json!({"a": {"b": 1}});
        let getters = getter_map(&state, "", &BTreeSet::new(), &AccessConfig::default());
        assert_eq!((getters["a.b"])(&json!({"a": {"b": 5}})), json!(5));
        assert_eq!((getters["a.b"])(&json!({})), Value::Null);
    }
}
