//! The state container seam.
//!
//! The resolver and the synthesis passes never own state or handlers. They
//! talk to a host through [`StateContainer`], and hand it new modules as
//! [`ModuleDefinition`]s.

use crate::mutations::default_mutations_with;
use crate::{AccessConfig, AccessResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An invokable action. Receives the container (so it can route further) and
/// the payload.
pub type ActionFn =
    Arc<dyn Fn(&mut dyn StateContainer, Value) -> AccessResult<Value> + Send + Sync>;

/// A state-mutating primitive. Receives the owning module's local state.
pub type MutationFn = Arc<dyn Fn(&mut Value, Value) -> AccessResult<()> + Send + Sync>;

/// A computed read accessor over the owning module's local state.
pub type GetterFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Reserved state field marking a module for sync integration.
pub const SYNC_MARKER: &str = "_conf";

/// Host state container consumed by the resolver and synthesis.
///
/// Paths handed to these methods are fully qualified: module namespace
/// followed by the handler name, e.g. `info/user/SET_NAME`.
pub trait StateContainer {
    /// Root state.
    fn state(&self) -> &Value;

    /// Computed value of the getter registered at exactly `path`.
    fn getter(&self, path: &str) -> Option<Value>;

    /// Whether an action is registered at `path`.
    fn has_action(&self, path: &str) -> bool;

    /// Run the action at `path`.
    fn dispatch(&mut self, path: &str, payload: Value) -> AccessResult<Value>;

    /// Whether a mutation is registered at `path`.
    fn has_mutation(&self, path: &str) -> bool;

    /// Run the mutation at `path`.
    fn commit(&mut self, path: &str, payload: Value) -> AccessResult<()>;

    /// Register a module under the given namespace segments.
    fn register_subtree(&mut self, name: &[String], definition: ModuleDefinition)
        -> AccessResult<()>;

    /// Register the actions of a synthesized accessor bundle under `name`.
    ///
    /// An action already registered at a bundle path is kept. Bundle actions
    /// a previous call installed under `name` are replaced.
    fn register_bundle(&mut self, name: &[String], definition: ModuleDefinition)
        -> AccessResult<()>;

    /// Every registered module namespace, each ending in `/`.
    fn module_namespaces(&self) -> Vec<String>;

    /// State subtree of a registered module, `None` for unknown namespaces
    /// and for modules registered without state.
    fn module_state(&self, namespace: &str) -> Option<&Value>;

    /// Whether the module at `namespace` carries the sync marker.
    fn is_sync_module(&self, namespace: &str) -> bool {
        self.module_state(namespace)
            .is_some_and(|state| state.get(SYNC_MARKER).is_some())
    }
}

/// A module to register: optional state plus handlers keyed by local name.
#[derive(Clone, Default)]
pub struct ModuleDefinition {
    /// Initial state; `None` registers a handler-only module.
    pub state: Option<Value>,
    /// Actions keyed by local name.
    pub actions: BTreeMap<String, ActionFn>,
    /// Mutations keyed by local name.
    pub mutations: BTreeMap<String, MutationFn>,
    /// Getters keyed by local name.
    pub getters: BTreeMap<String, GetterFn>,
}

impl ModuleDefinition {
    /// Create an empty, state-less module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a module with initial state.
    pub fn with_state(state: Value) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    /// Declare an action.
    #[must_use]
    pub fn action<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut dyn StateContainer, Value) -> AccessResult<Value> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(f));
        self
    }

    /// Declare a mutation.
    #[must_use]
    pub fn mutation<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Value, Value) -> AccessResult<()> + Send + Sync + 'static,
    {
        self.mutations.insert(name.into(), Arc::new(f));
        self
    }

    /// Declare a getter.
    #[must_use]
    pub fn getter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.getters.insert(name.into(), Arc::new(f));
        self
    }

    /// Add synthesized mutations for this module's state.
    ///
    /// Mutations already declared under the same name are kept.
    #[must_use]
    pub fn with_default_mutations(mut self, config: &AccessConfig) -> Self {
        if let Some(state) = &self.state {
            for (name, mutation) in default_mutations_with(state, config) {
                self.mutations.entry(name).or_insert(mutation);
            }
        }
        self
    }

    /// Add a read accessor for every reachable leaf of this module's state.
    ///
    /// Getters already declared under the same name are kept.
    #[must_use]
    pub fn with_leaf_getters(mut self, config: &AccessConfig) -> Self {
        if let Some(state) = &self.state {
            let getters = crate::bundle::getter_map(state, "", &Default::default(), config);
            for (name, getter) in getters {
                self.getters.entry(name).or_insert(getter);
            }
        }
        self
    }

    /// Whether the module declares no handlers at all.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.mutations.is_empty() && self.getters.is_empty()
    }
}

impl fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("state", &self.state)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("mutations", &self.mutations.keys().collect::<Vec<_>>())
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_mutations_keep_declared_ones() {
        let custom_called = json!("custom");
        let def = ModuleDefinition::with_state(json!({"name": "x"}))
            .mutation("SET_NAME", move |state, _| {
                state["name"] = custom_called.clone();
                Ok(())
            })
            .with_default_mutations(&AccessConfig::traditional());

        let mut state = json!({"name": "x"});
        (def.mutations["SET_NAME"])(&mut state, json!("ignored")).unwrap();
        assert_eq!(state["name"], "custom");
    }

    #[test]
    fn test_default_mutations_without_state_is_noop() {
        let def = ModuleDefinition::new().with_default_mutations(&AccessConfig::default());
        assert!(def.is_empty());
    }

    #[test]
    fn test_leaf_getters() {
        let def = ModuleDefinition::with_state(json!({"user": {"name": "x"}}))
            .with_leaf_getters(&AccessConfig::default());
        let state = json!({"user": {"name": "y"}});
        assert_eq!((def.getters["user.name"])(&state), json!("y"));
        assert_eq!((def.getters["user"])(&state), json!({"name": "y"}));
    }

    #[test]
    fn test_debug_lists_names() {
        let def = ModuleDefinition::new().action("go", |_, p| Ok(p));
        let debug = format!("{def:?}");
        assert!(debug.contains("go"));
    }
}
