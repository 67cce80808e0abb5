//! Handler and mutation naming rules.
//!
//! All names derive from the dotted property path (`props`) by pure string
//! transforms:
//!
//! | role            | flat          | traditional               |
//! |-----------------|---------------|---------------------------|
//! | set action      | `props`       | `"set" + Capitalized`     |
//! | set mutation    | `props`       | `"SET_" + UPPERCASED`     |
//! | delete action   | `"-" + props` | `"delete" + Capitalized`  |
//! | delete mutation | `"-" + props` | `"DELETE_" + UPPERCASED`  |
//!
//! *Capitalized* upper-cases only the first character and keeps the rest,
//! dots included: `c.d` becomes `C.d`.

use crate::Pattern;

/// Prefix for flat delete names.
pub const DELETE_PREFIX: &str = "-";

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Action name tried first by `set`.
pub fn setter_action_name(props: &str, pattern: Pattern) -> String {
    match pattern {
        Pattern::Flat => props.to_string(),
        Pattern::Traditional => format!("set{}", capitalize_first(props)),
    }
}

/// Mutation name `set` falls back to.
pub fn setter_mutation_name(props: &str, pattern: Pattern) -> String {
    match pattern {
        Pattern::Flat => props.to_string(),
        Pattern::Traditional => raw_set_name(props),
    }
}

/// Action name tried first by `delete`.
pub fn deleter_action_name(props: &str, pattern: Pattern) -> String {
    match pattern {
        Pattern::Flat => format!("{DELETE_PREFIX}{props}"),
        Pattern::Traditional => format!("delete{}", capitalize_first(props)),
    }
}

/// Mutation name `delete` falls back to.
pub fn deleter_mutation_name(props: &str, pattern: Pattern) -> String {
    match pattern {
        Pattern::Flat => format!("{DELETE_PREFIX}{props}"),
        Pattern::Traditional => format!("DELETE_{}", props.to_uppercase()),
    }
}

/// `SET_` primitive name for a dot path.
pub fn raw_set_name(path: &str) -> String {
    format!("SET_{}", path.to_uppercase())
}

/// `POP_` primitive name for a dot path.
pub fn raw_pop_name(path: &str) -> String {
    format!("POP_{}", path.to_uppercase())
}

/// `PUSH_` primitive name for a dot path.
pub fn raw_push_name(path: &str) -> String {
    format!("PUSH_{}", path.to_uppercase())
}

/// `SPLICE_` primitive name for a dot path.
pub fn raw_splice_name(path: &str) -> String {
    format!("SPLICE_{}", path.to_uppercase())
}
