//! Path-based `get`, `set` and `delete`.
//!
//! A write at `module/path/props` is routed to the first of:
//!
//! 1. an action at `module/path/` + action name,
//! 2. with sync integration on and a sync-marked module, the module's bulk
//!    `set` / `delete` action,
//! 3. a mutation at `module/path/` + mutation name.
//!
//! Names follow the configured [`Pattern`](crate::Pattern), see
//! [`naming`](crate::naming). When nothing matches the call fails and the
//! state is left untouched.

use crate::naming::{
    deleter_action_name, deleter_mutation_name, setter_action_name, setter_mutation_name,
};
use crate::path::{AccessPath, PROP_SEPARATOR, WILDCARD};
use crate::shape::payload_id;
use crate::store::StateContainer;
use crate::{get_at, AccessConfig, AccessError, AccessResult, Path};
use serde_json::{Map, Value};

/// Name of the bulk set action on sync-marked modules.
pub const SYNC_SET_ACTION: &str = "set";

/// Name of the bulk delete action on sync-marked modules.
pub const SYNC_DELETE_ACTION: &str = "delete";

/// Where a write was routed.
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    /// A custom or synthesized action under the conventional name.
    Action {
        /// Fully-qualified action path.
        path: String,
    },
    /// The bulk action of a sync-marked module, with the payload it receives.
    SyncAction {
        /// Fully-qualified action path.
        path: String,
        /// Re-shaped payload (nested object for set, target id for delete).
        payload: Value,
    },
    /// A mutation under the conventional name.
    Mutation {
        /// Fully-qualified mutation path.
        path: String,
    },
}

impl Route {
    /// Fully-qualified handler path.
    pub fn path(&self) -> &str {
        match self {
            Route::Action { path } | Route::SyncAction { path, .. } | Route::Mutation { path } => {
                path
            }
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Route::Action { .. } => "action",
            Route::SyncAction { .. } => "sync_action",
            Route::Mutation { .. } => "mutation",
        }
    }
}

/// Result of a routed write.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// An action ran and returned `result`.
    Dispatched {
        /// Fully-qualified action path.
        path: String,
        /// Whatever the action returned.
        result: Value,
    },
    /// A mutation ran.
    Committed {
        /// Fully-qualified mutation path.
        path: String,
    },
}

impl Outcome {
    /// Handler path that ran.
    pub fn path(&self) -> &str {
        match self {
            Outcome::Dispatched { path, .. } | Outcome::Committed { path } => path,
        }
    }

    /// Action result, or `null` for a commit.
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Dispatched { result, .. } => result,
            Outcome::Committed { .. } => Value::Null,
        }
    }
}

/// Read the value at `path`.
///
/// A getter registered under exactly `path` wins. Otherwise `/` and `.` are
/// both treated as separators into the root state. Unparsable paths and
/// misses yield `None`.
pub fn get<S: StateContainer + ?Sized>(store: &S, path: &str) -> Option<Value> {
    if let Some(value) = store.getter(path) {
        return Some(value);
    }
    let parsed = Path::parse_state_path(path).ok()?;
    get_at(store.state(), &parsed).cloned()
}

/// Decide where a `set` would go, without running anything.
pub fn plan_set<S: StateContainer + ?Sized>(
    store: &S,
    path: &str,
    payload: &Value,
    config: &AccessConfig,
) -> AccessResult<Route> {
    let access = AccessPath::parse(path)?;
    let props = access.props();
    let action_path = access.in_module(&setter_action_name(props, config.pattern));
    let mutation_name = setter_mutation_name(props, config.pattern);
    let mutation_path = access.in_module(&mutation_name);

    store
        .has_action(&action_path)
        .then(|| Route::Action { path: action_path })
        .or_else(|| sync_set_route(store, &access, payload, config))
        .or_else(|| {
            store.has_mutation(&mutation_path).then(|| Route::Mutation {
                path: mutation_path.clone(),
            })
        })
        .ok_or_else(|| AccessError::missing_setter(mutation_path, mutation_name, props))
}

/// Set the value at `path` through the first matching handler.
///
/// ```
/// use easy_access::{set, AccessConfig, MemoryStore, ModuleDefinition, Outcome};
/// use serde_json::json;
///
/// let conf = AccessConfig::traditional();
/// let root = ModuleDefinition::with_state(json!({"count": 0})).with_default_mutations(&conf);
/// let mut store = MemoryStore::from_root(root).unwrap();
///
/// let outcome = set(&mut store, "count", json!(3), &conf).unwrap();
/// assert_eq!(outcome, Outcome::Committed { path: "SET_COUNT".into() });
/// ```
pub fn set<S: StateContainer + ?Sized>(
    store: &mut S,
    path: &str,
    payload: Value,
    config: &AccessConfig,
) -> AccessResult<Outcome> {
    let route = plan_set(store, path, &payload, config).inspect_err(|err| {
        tracing::warn!(error = %err, path, "set could not be routed");
    })?;
    execute(store, "set", path, route, payload)
}

/// Decide where a `delete` would go, without running anything.
pub fn plan_delete<S: StateContainer + ?Sized>(
    store: &S,
    path: &str,
    payload: Option<&Value>,
    config: &AccessConfig,
) -> AccessResult<Route> {
    let access = AccessPath::parse(path)?;
    let props = access.props();
    let action_path = access.in_module(&deleter_action_name(props, config.pattern));
    let mutation_name = deleter_mutation_name(props, config.pattern);
    let mutation_path = access.in_module(&mutation_name);

    store
        .has_action(&action_path)
        .then(|| Route::Action { path: action_path })
        .or_else(|| sync_delete_route(store, &access, payload, config))
        .or_else(|| {
            store.has_mutation(&mutation_path).then(|| Route::Mutation {
                path: mutation_path.clone(),
            })
        })
        .ok_or_else(|| AccessError::missing_deleter(mutation_path, mutation_name, props))
}

/// Delete at `path` through the first matching handler.
///
/// `payload` is typically absent, an id, or an object carrying `id`.
pub fn delete<S: StateContainer + ?Sized>(
    store: &mut S,
    path: &str,
    payload: Option<Value>,
    config: &AccessConfig,
) -> AccessResult<Outcome> {
    let route = plan_delete(store, path, payload.as_ref(), config).inspect_err(|err| {
        tracing::warn!(error = %err, path, "delete could not be routed");
    })?;
    execute(store, "delete", path, route, payload.unwrap_or(Value::Null))
}

fn execute<S: StateContainer + ?Sized>(
    store: &mut S,
    verb: &'static str,
    path: &str,
    route: Route,
    payload: Value,
) -> AccessResult<Outcome> {
    tracing::debug!(verb, path, route = route.kind(), target = route.path(), "routed");
    match route {
        Route::Action { path } => {
            let result = store.dispatch(&path, payload)?;
            Ok(Outcome::Dispatched { path, result })
        }
        Route::SyncAction {
            path,
            payload: reshaped,
        } => {
            let result = store.dispatch(&path, reshaped)?;
            Ok(Outcome::Dispatched { path, result })
        }
        Route::Mutation { path } => {
            store.commit(&path, payload)?;
            Ok(Outcome::Committed { path })
        }
    }
}

fn sync_set_route<S: StateContainer + ?Sized>(
    store: &S,
    access: &AccessPath,
    payload: &Value,
    config: &AccessConfig,
) -> Option<Route> {
    if !config.sync_integration || !store.is_sync_module(access.module_path()) {
        return None;
    }
    let path = access.in_module(SYNC_SET_ACTION);
    store.has_action(&path).then(|| Route::SyncAction {
        path,
        payload: renest_payload(access.props(), payload),
    })
}

fn sync_delete_route<S: StateContainer + ?Sized>(
    store: &S,
    access: &AccessPath,
    payload: Option<&Value>,
    config: &AccessConfig,
) -> Option<Route> {
    if !config.sync_integration || !store.is_sync_module(access.module_path()) {
        return None;
    }
    let payload = payload?;
    let target = match payload {
        Value::String(id) if !id.is_empty() => id.clone(),
        Value::Object(_) => payload_id(payload)?,
        _ => return None,
    };
    let path = access.in_module(SYNC_DELETE_ACTION);
    store.has_action(&path).then(|| Route::SyncAction {
        path,
        payload: Value::String(target),
    })
}

/// Nest `payload` under the dot segments of `props`.
///
/// `sub.prop` with payload `p` becomes `{"sub": {"prop": p}}`. A segment that
/// is exactly `*` is replaced by the payload's id when it carries one. Empty
/// props return the payload unchanged.
///
/// ```
/// use easy_access::renest_payload;
/// use serde_json::json;
///
/// let nested = renest_payload("items.*", &json!({"id": "42", "done": true}));
/// assert_eq!(nested, json!({"items": {"42": {"id": "42", "done": true}}}));
/// ```
pub fn renest_payload(props: &str, payload: &Value) -> Value {
    if props.is_empty() {
        return payload.clone();
    }
    let id = payload_id(payload);
    props
        .split(PROP_SEPARATOR)
        .rev()
        .fold(payload.clone(), |inner, segment| {
            let key = match (&id, segment) {
                (Some(id), WILDCARD) => id.clone(),
                _ => segment.to_string(),
            };
            let mut map = Map::new();
            map.insert(key, inner);
            Value::Object(map)
        })
}

/// Method-call surface over any [`StateContainer`].
pub trait AccessExt: StateContainer {
    /// See [`get`].
    fn get(&self, path: &str) -> Option<Value> {
        get(self, path)
    }

    /// See [`set`].
    fn set(&mut self, path: &str, payload: Value, config: &AccessConfig) -> AccessResult<Outcome> {
        set(self, path, payload, config)
    }

    /// See [`delete`].
    fn delete(
        &mut self,
        path: &str,
        payload: Option<Value>,
        config: &AccessConfig,
    ) -> AccessResult<Outcome> {
        delete(self, path, payload, config)
    }

    /// See [`generate_accessor_modules`](crate::generate_accessor_modules).
    fn generate_accessor_modules(&mut self, config: &AccessConfig) -> AccessResult<usize> {
        crate::bundle::generate_accessor_modules(self, config)
    }
}

impl<S: StateContainer + ?Sized> AccessExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, ModuleDefinition, Pattern};
    use serde_json::json;

    fn record(name: &'static str) -> impl Fn(&mut Value, Value) -> AccessResult<()> {
        move |state: &mut Value, payload: Value| {
            state["last"] = json!({"by": name, "payload": payload});
            Ok(())
        }
    }

    #[test]
    fn test_get_prefers_getter() {
        let root = ModuleDefinition::with_state(json!({"a": {"b": 1}}))
            .getter("a.b", |_| json!("computed"));
        let store = MemoryStore::from_root(root).unwrap();
        assert_eq!(get(&store, "a.b"), Some(json!("computed")));
        assert_eq!(get(&store, "a"), Some(json!({"b": 1})));
        assert_eq!(get(&store, "a.x"), None);
        assert_eq!(get(&store, "a..b"), None);
    }

    #[test]
    fn test_get_crosses_module_separator() {
        let store = MemoryStore::new(json!({}))
            .with_module("info/user", ModuleDefinition::with_state(json!({"fav": {"c": "red"}})))
            .unwrap();
        assert_eq!(get(&store, "info/user/fav.c"), Some(json!("red")));
        assert_eq!(get(&store, ""), Some(store.state().clone()));
    }

    #[test]
    fn test_missing_setter_flat() {
        let mut store = MemoryStore::new(json!({}));
        let err = set(&mut store, "a/b/c.d", json!(5), &AccessConfig::default()).unwrap_err();
        match err {
            AccessError::MissingSetterMutation {
                mutation_path,
                mutation_name,
                props,
            } => {
                assert_eq!(mutation_path, "a/b/c.d");
                assert_eq!(mutation_name, "c.d");
                assert_eq!(props, "c.d");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_setter_traditional() {
        let mut store = MemoryStore::new(json!({}));
        let err = set(&mut store, "a/b/c.d", json!(5), &AccessConfig::traditional()).unwrap_err();
        assert!(matches!(
            err,
            AccessError::MissingSetterMutation { ref mutation_path, .. }
                if mutation_path == "a/b/SET_C.D"
        ));
    }

    #[test]
    fn test_traditional_names_route() {
        let module = ModuleDefinition::with_state(json!({}))
            .action("setC.d", |_, p| Ok(json!({"action": p})))
            .mutation("SET_C.D", record("mutation"));
        let mut store = MemoryStore::new(json!({}))
            .with_module("a/b", module)
            .unwrap();
        let conf = AccessConfig::traditional();

        let route = plan_set(&store, "a/b/c.d", &json!(5), &conf).unwrap();
        assert_eq!(route, Route::Action { path: "a/b/setC.d".into() });
        let outcome = set(&mut store, "a/b/c.d", json!(5), &conf).unwrap();
        assert_eq!(outcome.into_value(), json!({"action": 5}));
    }

    #[test]
    fn test_action_beats_mutation() {
        let root = ModuleDefinition::with_state(json!({}))
            .action("name", |_, _| Ok(json!("action")))
            .mutation("name", record("mutation"));
        let mut store = MemoryStore::from_root(root).unwrap();
        let outcome = set(&mut store, "name", json!(1), &AccessConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Dispatched { path: "name".into(), result: json!("action") });
        assert!(store.state().get("last").is_none());
    }

    #[test]
    fn test_mutation_fallback() {
        let root = ModuleDefinition::with_state(json!({})).mutation("name", record("mutation"));
        let mut store = MemoryStore::from_root(root).unwrap();
        let outcome = set(&mut store, "name", json!(1), &AccessConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Committed { path: "name".into() });
        assert_eq!(store.state()["last"]["payload"], 1);
    }

    #[test]
    fn test_invalid_path_fails_before_lookup() {
        let mut store = MemoryStore::new(json!({"x": 1}));
        let err = set(&mut store, "x.", json!(1), &AccessConfig::default()).unwrap_err();
        assert!(matches!(err, AccessError::InvalidPath { .. }));
        assert_eq!(store.state(), &json!({"x": 1}));
    }

    #[test]
    fn test_flat_delete_names() {
        let root = ModuleDefinition::with_state(json!({})).mutation("-items", record("del"));
        let mut store = MemoryStore::from_root(root).unwrap();
        let conf = AccessConfig::default();
        let outcome = delete(&mut store, "items", Some(json!("7")), &conf).unwrap();
        assert_eq!(outcome.path(), "-items");

        let err = delete(&mut store, "other", None, &conf).unwrap_err();
        assert!(matches!(
            err,
            AccessError::MissingDeleteMutation { ref mutation_path, .. }
                if mutation_path == "-other"
        ));
    }

    fn sync_store() -> MemoryStore {
        let items = ModuleDefinition::with_state(json!({"_conf": {"provider": "x"}, "list": {}}))
            .action("set", |_, p| Ok(json!({"bulk_set": p})))
            .action("delete", |_, p| Ok(json!({"bulk_delete": p})))
            .mutation("list.*", record("set_mutation"))
            .mutation("-list.*", record("delete_mutation"));
        MemoryStore::new(json!({})).with_module("items", items).unwrap()
    }

    #[test]
    fn test_sync_set_renests_payload() {
        let mut store = sync_store();
        let conf = AccessConfig::default().with_sync_integration(true);
        let outcome = set(&mut store, "items/list.*", json!({"id": "42", "v": 1}), &conf).unwrap();
        assert_eq!(
            outcome.into_value(),
            json!({"bulk_set": {"list": {"42": {"id": "42", "v": 1}}}})
        );
    }

    #[test]
    fn test_sync_set_empty_props_passes_payload() {
        let mut store = sync_store();
        let conf = AccessConfig::default().with_sync_integration(true);
        let outcome = set(&mut store, "items/", json!({"a": 1}), &conf).unwrap();
        assert_eq!(outcome.into_value(), json!({"bulk_set": {"a": 1}}));
    }

    #[test]
    fn test_sync_disabled_uses_mutation() {
        let mut store = sync_store();
        let outcome = set(&mut store, "items/list.*", json!({"id": "1"}), &AccessConfig::default())
            .unwrap();
        assert_eq!(outcome, Outcome::Committed { path: "items/list.*".into() });
    }

    #[test]
    fn test_sync_delete_targets() {
        let mut store = sync_store();
        let conf = AccessConfig::default().with_sync_integration(true);

        let by_object =
            delete(&mut store, "items/list.*", Some(json!({"id": "42"})), &conf).unwrap();
        assert_eq!(by_object.into_value(), json!({"bulk_delete": "42"}));

        let by_string = delete(&mut store, "items/list.*", Some(json!("43")), &conf).unwrap();
        assert_eq!(by_string.into_value(), json!({"bulk_delete": "43"}));

        let no_target = delete(&mut store, "items/list.*", Some(json!(12)), &conf).unwrap();
        assert_eq!(no_target, Outcome::Committed { path: "items/-list.*".into() });
    }

    #[test]
    fn test_renest_only_rewrites_wildcards() {
        let payload = json!({"id": "9"});
        assert_eq!(
            renest_payload("a.b", &payload),
            json!({"a": {"b": {"id": "9"}}})
        );
        assert_eq!(
            renest_payload("a.*.b", &payload),
            json!({"a": {"9": {"b": {"id": "9"}}}})
        );
        assert_eq!(renest_payload("a.*", &json!(5)), json!({"a": {"*": 5}}));
    }

    #[test]
    fn test_ext_trait_methods() {
        let conf = AccessConfig::default().with_pattern(Pattern::Traditional);
        let root = ModuleDefinition::with_state(json!({"n": 1})).with_default_mutations(&conf);
        let mut store = MemoryStore::from_root(root).unwrap();
        AccessExt::set(&mut store, "n", json!(2), &conf).unwrap();
        assert_eq!(AccessExt::get(&store, "n"), Some(json!(2)));
    }
}
