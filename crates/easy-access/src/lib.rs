//! Path-addressed access to a namespaced JSON state tree.
//!
//! `easy-access` lets callers read and write nested state through a single
//! path string such as `info/user/favColours.primary`, instead of naming a
//! dedicated handler for every field.
//!
//! # Core Concepts
//!
//! - **StateContainer**: the host that owns state, actions, mutations and getters
//! - **AccessPath**: a full path split into module path and props
//! - **Route**: where a write goes (custom action, sync bulk action, or mutation)
//! - **Synthesis**: setter and deleter bundles and raw mutations derived from
//!   a state shape
//! - **MemoryStore**: an in-memory container for tests and embedding
//!
//! # Routing
//!
//! ```text
//! set("ns/a.b", v)  ->  action "ns/a.b"  |  sync "ns/set"  |  mutation "ns/a.b"
//! ```
//!
//! With the traditional pattern the names become `setA.b` and `SET_A.B`.
//!
//! # Quick Start
//!
//! ```
//! use easy_access::{AccessConfig, AccessExt, MemoryStore, ModuleDefinition};
//! use serde_json::json;
//!
//! let conf = AccessConfig::default();
//! let root = ModuleDefinition::with_state(json!({"user": {"name": "", "tags": {}}}))
//!     .with_default_mutations(&conf);
//! let mut store = MemoryStore::from_root(root).unwrap();
//!
//! store.set("user.name", json!("Luca"), &conf).unwrap();
//! store.set("user.tags.*", json!({"id": "a", "label": "admin"}), &conf).unwrap();
//! assert_eq!(store.get("user.name"), Some(json!("Luca")));
//! assert_eq!(store.get("user.tags.a.label"), Some(json!("admin")));
//!
//! store.delete("user.tags", Some(json!("a")), &conf).unwrap();
//! assert_eq!(store.get("user.tags"), Some(json!({})));
//! ```
//!
//! # Raw Tree Operations
//!
//! The primitives under the resolver work on any `Value`:
//!
//! ```
//! use easy_access::{apply_ops, path, Op};
//! use serde_json::json;
//!
//! let state = json!({"list": [1, 2]});
//! let ops = [
//!     Op::push(path!("list"), 3),
//!     Op::set(path!("meta", "count"), 3),
//! ];
//! let next = apply_ops(&state, &ops).unwrap();
//! assert_eq!(next, json!({"list": [1, 2, 3], "meta": {"count": 3}}));
//! assert_eq!(state, json!({"list": [1, 2]}));
//! ```

mod access;
mod apply;
pub mod bundle;
mod config;
mod error;
mod memory;
pub mod mutations;
pub mod naming;
mod op;
mod path;
mod shape;
mod store;

// Tree primitives
pub use apply::{
    append_at, apply_op, apply_ops, delete_at, get_at, get_at_mut, pop_at, set_at, splice_at,
};
pub use error::{value_type_name, AccessError, AccessResult};
pub use op::{Op, SplicePayload};
pub use path::{
    namespace_of, namespace_segments, AccessPath, Path, MODULE_SEPARATOR, PROP_SEPARATOR,
    WILDCARD,
};
pub use shape::{payload_id, Shape};

// Configuration
pub use config::{AccessConfig, ConfigOverrides, Pattern};

// Container seam
pub use memory::MemoryStore;
pub use store::{ActionFn, GetterFn, ModuleDefinition, MutationFn, StateContainer, SYNC_MARKER};

// Resolution and synthesis
pub use access::{
    delete, get, plan_delete, plan_set, renest_payload, set, AccessExt, Outcome, Route,
    SYNC_DELETE_ACTION, SYNC_SET_ACTION,
};
pub use bundle::generate_accessor_modules;
pub use mutations::{default_mutations, default_mutations_with};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
