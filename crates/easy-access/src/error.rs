//! Error types for easy-access operations.

use thiserror::Error;

/// Result type alias for easy-access operations.
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors that can occur while resolving or applying an access path.
#[derive(Debug, Error)]
pub enum AccessError {
    /// A `set` call found no action and no mutation to route to.
    #[error("missing setter mutation `{mutation_name}` at `{mutation_path}` (props: `{props}`)")]
    MissingSetterMutation {
        /// Fully-qualified mutation path that was looked up.
        mutation_path: String,
        /// Mutation name computed from the props and naming pattern.
        mutation_name: String,
        /// Original property path.
        props: String,
    },

    /// A `delete` call found no action and no mutation to route to.
    #[error("missing delete mutation `{mutation_name}` at `{mutation_path}` (props: `{props}`)")]
    MissingDeleteMutation {
        /// Fully-qualified mutation path that was looked up.
        mutation_path: String,
        /// Mutation name computed from the props and naming pattern.
        mutation_name: String,
        /// Original property path.
        props: String,
    },

    /// The path string is structurally invalid.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Type mismatch when walking or writing a value.
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        /// The path where the mismatch occurred.
        path: String,
        /// The expected type.
        expected: &'static str,
        /// The actual type found.
        found: &'static str,
    },

    /// Array index is out of bounds.
    #[error("index {index} out of bounds (len: {len}) at `{path}`")]
    IndexOutOfBounds {
        /// The path to the array.
        path: String,
        /// The index that was accessed.
        index: usize,
        /// The actual length of the array.
        len: usize,
    },

    /// A container was asked to run a handler it does not hold.
    #[error("no handler registered at `{path}`")]
    UnknownHandler {
        /// The handler path.
        path: String,
    },

    /// A handler reported a failure of its own.
    #[error("handler `{path}` failed: {message}")]
    Handler {
        /// The handler path.
        path: String,
        /// Description of what went wrong.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AccessError {
    /// Create a missing setter mutation error.
    #[inline]
    pub fn missing_setter(
        mutation_path: impl Into<String>,
        mutation_name: impl Into<String>,
        props: impl Into<String>,
    ) -> Self {
        AccessError::MissingSetterMutation {
            mutation_path: mutation_path.into(),
            mutation_name: mutation_name.into(),
            props: props.into(),
        }
    }

    /// Create a missing delete mutation error.
    #[inline]
    pub fn missing_deleter(
        mutation_path: impl Into<String>,
        mutation_name: impl Into<String>,
        props: impl Into<String>,
    ) -> Self {
        AccessError::MissingDeleteMutation {
            mutation_path: mutation_path.into(),
            mutation_name: mutation_name.into(),
            props: props.into(),
        }
    }

    /// Create an invalid path error.
    #[inline]
    pub fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        AccessError::InvalidPath {
            path: path.into(),
            reason,
        }
    }

    /// Create a type mismatch error.
    #[inline]
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        AccessError::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create an index out of bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: impl Into<String>, index: usize, len: usize) -> Self {
        AccessError::IndexOutOfBounds {
            path: path.into(),
            index,
            len,
        }
    }

    /// Create an unknown handler error.
    #[inline]
    pub fn unknown_handler(path: impl Into<String>) -> Self {
        AccessError::UnknownHandler { path: path.into() }
    }

    /// Create a handler failure error.
    #[inline]
    pub fn handler(path: impl Into<String>, message: impl Into<String>) -> Self {
        AccessError::Handler {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true for the two "nothing to route to" failures.
    pub fn is_missing_handler(&self) -> bool {
        matches!(
            self,
            AccessError::MissingSetterMutation { .. } | AccessError::MissingDeleteMutation { .. }
        )
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
