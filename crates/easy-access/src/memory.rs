//! In-memory reference container.
//!
//! `MemoryStore` keeps the whole tree in one `Value`. A module's state lives
//! nested in the root at the module's segments, so `info/user/` owns
//! `state.info.user`. Mutations see their module-local state; getters compute
//! over it.

use crate::path::{namespace_of, namespace_segments};
use crate::store::{ActionFn, GetterFn, ModuleDefinition, MutationFn, StateContainer};
use crate::{get_at, get_at_mut, set_at, AccessError, AccessResult, Path};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A handler bound to the module that declared it.
#[derive(Clone)]
struct Bound<F> {
    module: Path,
    handler: F,
}

/// Bookkeeping for one registered namespace.
#[derive(Clone, Debug, Default)]
struct ModuleEntry {
    has_state: bool,
    handler_paths: Vec<String>,
    bundle_paths: Vec<String>,
}

/// Reference implementation of [`StateContainer`].
///
/// # Example
///
/// ```
/// use easy_access::{AccessConfig, AccessExt, MemoryStore, ModuleDefinition};
/// use serde_json::json;
///
/// let conf = AccessConfig::traditional();
/// let mut store = MemoryStore::new(json!({}));
/// store
///     .register_module(
///         "info/user",
///         ModuleDefinition::with_state(json!({"name": "x"})).with_default_mutations(&conf),
///     )
///     .unwrap();
///
/// store.set("info/user/name", json!("Luca"), &conf).unwrap();
/// assert_eq!(store.get("info/user/name"), Some(json!("Luca")));
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Value,
    getters: BTreeMap<String, Bound<GetterFn>>,
    actions: BTreeMap<String, ActionFn>,
    mutations: BTreeMap<String, Bound<MutationFn>>,
    modules: BTreeMap<String, ModuleEntry>,
    /// Action paths currently held by a synthesized bundle.
    bundled: BTreeSet<String>,
}

impl MemoryStore {
    /// Create a store around a root state with no handlers.
    pub fn new(state: Value) -> Self {
        let state = if state.is_null() {
            Value::Object(Map::new())
        } else {
            state
        };
        Self {
            state,
            ..Self::default()
        }
    }

    /// Create a store from a root module definition.
    pub fn from_root(root: ModuleDefinition) -> AccessResult<Self> {
        let mut store = Self::new(Value::Object(Map::new()));
        store.register_subtree(&[], root)?;
        Ok(store)
    }

    /// Register a module by its namespace string, e.g. `info/user`.
    pub fn register_module(
        &mut self,
        namespace: &str,
        definition: ModuleDefinition,
    ) -> AccessResult<()> {
        self.register_subtree(&namespace_segments(namespace), definition)
    }

    /// Builder form of [`register_module`](Self::register_module).
    pub fn with_module(
        mut self,
        namespace: &str,
        definition: ModuleDefinition,
    ) -> AccessResult<Self> {
        self.register_module(namespace, definition)?;
        Ok(self)
    }

    /// Mutable root state, bypassing every handler.
    pub fn state_mut(&mut self) -> &mut Value {
        &mut self.state
    }

    /// Clone the current root state.
    pub fn snapshot(&self) -> Value {
        self.state.clone()
    }

    /// Consume the store and return the root state.
    pub fn into_state(self) -> Value {
        self.state
    }

    /// Registered action paths, sorted.
    pub fn action_paths(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Registered mutation paths, sorted.
    pub fn mutation_paths(&self) -> impl Iterator<Item = &str> {
        self.mutations.keys().map(String::as_str)
    }

    /// Drop every handler a previous registration of `namespace` installed.
    fn unregister(&mut self, namespace: &str) {
        if let Some(entry) = self.modules.remove(namespace) {
            for path in entry.handler_paths {
                self.actions.remove(&path);
                self.mutations.remove(&path);
                self.getters.remove(&path);
            }
            self.drop_bundle_actions(&entry.bundle_paths);
        }
    }

    /// Remove bundle actions that no declared registration has taken over.
    fn drop_bundle_actions(&mut self, paths: &[String]) {
        for path in paths {
            if self.bundled.remove(path) {
                self.actions.remove(path);
            }
        }
    }
}

impl StateContainer for MemoryStore {
    fn state(&self) -> &Value {
        &self.state
    }

    fn getter(&self, path: &str) -> Option<Value> {
        let bound = self.getters.get(path)?;
        let local = get_at(&self.state, &bound.module).unwrap_or(&Value::Null);
        Some((bound.handler)(local))
    }

    fn has_action(&self, path: &str) -> bool {
        self.actions.contains_key(path)
    }

    fn dispatch(&mut self, path: &str, payload: Value) -> AccessResult<Value> {
        let action = self
            .actions
            .get(path)
            .cloned()
            .ok_or_else(|| AccessError::unknown_handler(path))?;
        tracing::trace!(path, "dispatch");
        action(self, payload)
    }

    fn has_mutation(&self, path: &str) -> bool {
        self.mutations.contains_key(path)
    }

    fn commit(&mut self, path: &str, payload: Value) -> AccessResult<()> {
        let bound = self
            .mutations
            .get(path)
            .cloned()
            .ok_or_else(|| AccessError::unknown_handler(path))?;
        let local = get_at_mut(&mut self.state, &bound.module)
            .ok_or_else(|| AccessError::handler(path, "module state is missing"))?;
        tracing::trace!(path, "commit");
        (bound.handler)(local, payload)
    }

    fn register_subtree(
        &mut self,
        name: &[String],
        definition: ModuleDefinition,
    ) -> AccessResult<()> {
        let namespace = namespace_of(name);
        let module = Path::from_segments(name.to_vec());

        let has_state = match definition.state {
            Some(state) => {
                set_at(&mut self.state, &module, state)?;
                true
            }
            None => self
                .modules
                .get(&namespace)
                .is_some_and(|entry| entry.has_state),
        };
        self.unregister(&namespace);

        let mut handler_paths = Vec::new();
        for (local, action) in definition.actions {
            let full = format!("{namespace}{local}");
            self.bundled.remove(&full);
            self.actions.insert(full.clone(), action);
            handler_paths.push(full);
        }
        for (local, handler) in definition.mutations {
            let full = format!("{namespace}{local}");
            let bound = Bound {
                module: module.clone(),
                handler,
            };
            self.mutations.insert(full.clone(), bound);
            handler_paths.push(full);
        }
        for (local, handler) in definition.getters {
            let full = format!("{namespace}{local}");
            let bound = Bound {
                module: module.clone(),
                handler,
            };
            self.getters.insert(full.clone(), bound);
            handler_paths.push(full);
        }

        tracing::debug!(
            namespace = %namespace,
            handlers = handler_paths.len(),
            has_state,
            "registered module"
        );
        self.modules.insert(
            namespace,
            ModuleEntry {
                has_state,
                handler_paths,
                bundle_paths: Vec::new(),
            },
        );
        Ok(())
    }

    fn register_bundle(
        &mut self,
        name: &[String],
        definition: ModuleDefinition,
    ) -> AccessResult<()> {
        let namespace = namespace_of(name);
        let stale = self
            .modules
            .get_mut(&namespace)
            .map(|entry| std::mem::take(&mut entry.bundle_paths))
            .unwrap_or_default();
        self.drop_bundle_actions(&stale);

        let mut bundle_paths = Vec::new();
        let mut kept = 0;
        for (local, action) in definition.actions {
            let full = format!("{namespace}{local}");
            if self.actions.contains_key(&full) {
                tracing::debug!(path = %full, "kept declared action over bundle accessor");
                kept += 1;
                continue;
            }
            self.actions.insert(full.clone(), action);
            self.bundled.insert(full.clone());
            bundle_paths.push(full);
        }

        tracing::debug!(
            namespace = %namespace,
            handlers = bundle_paths.len(),
            kept,
            "registered bundle"
        );
        self.modules.entry(namespace).or_default().bundle_paths = bundle_paths;
        Ok(())
    }

    fn module_namespaces(&self) -> Vec<String> {
        self.modules
            .keys()
            .filter(|ns| !ns.is_empty())
            .cloned()
            .collect()
    }

    fn module_state(&self, namespace: &str) -> Option<&Value> {
        if namespace.is_empty() {
            return None;
        }
        let entry = self.modules.get(namespace)?;
        if !entry.has_state {
            return None;
        }
        get_at(&self.state, &Path::from_segments(namespace_segments(namespace)))
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("state", &self.state)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.len())
            .field("mutations", &self.mutations.len())
            .field("getters", &self.getters.len())
            .finish()
    }
}
