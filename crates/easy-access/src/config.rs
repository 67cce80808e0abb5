//! Access configuration.
//!
//! Configuration is a plain value. Every resolver and synthesis call takes it
//! explicitly; there is no process-wide setting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Naming convention for handlers and mutations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Handler and mutation names are the raw dotted property path.
    #[default]
    Flat,
    /// Prefixed, capitalized names: `setX`, `SET_X`, `deleteX`, `DELETE_X`.
    Traditional,
}

/// Settings shared by the resolver and the synthesis passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Naming convention.
    pub pattern: Pattern,
    /// Name of the sub-module that holds synthesized setters.
    pub setter_namespace: String,
    /// Name of the sub-module that holds synthesized deleters.
    pub deleter_namespace: String,
    /// Skip keys starting with `_` during synthesis.
    pub ignore_private_props: bool,
    /// Fully-qualified paths that synthesis skips.
    pub ignore_props: BTreeSet<String>,
    /// Offer sets/deletes on sync-marked modules to their bulk actions first.
    pub sync_integration: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            pattern: Pattern::Flat,
            setter_namespace: "set".to_string(),
            deleter_namespace: "delete".to_string(),
            ignore_private_props: true,
            ignore_props: BTreeSet::new(),
            sync_integration: false,
        }
    }
}

impl AccessConfig {
    /// Defaults with the traditional naming pattern.
    pub fn traditional() -> Self {
        Self::default().with_pattern(Pattern::Traditional)
    }

    /// Set the naming pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the setter sub-module name.
    #[must_use]
    pub fn with_setter_namespace(mut self, name: impl Into<String>) -> Self {
        self.setter_namespace = name.into();
        self
    }

    /// Set the deleter sub-module name.
    #[must_use]
    pub fn with_deleter_namespace(mut self, name: impl Into<String>) -> Self {
        self.deleter_namespace = name.into();
        self
    }

    /// Toggle skipping of `_`-prefixed keys.
    #[must_use]
    pub fn with_ignore_private_props(mut self, ignore: bool) -> Self {
        self.ignore_private_props = ignore;
        self
    }

    /// Add a fully-qualified path that synthesis should skip.
    #[must_use]
    pub fn with_ignored_prop(mut self, path: impl Into<String>) -> Self {
        self.ignore_props.insert(path.into());
        self
    }

    /// Toggle sync integration.
    #[must_use]
    pub fn with_sync_integration(mut self, enabled: bool) -> Self {
        self.sync_integration = enabled;
        self
    }

    /// Apply caller overrides on top of this config.
    #[must_use]
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(pattern) = overrides.pattern {
            self.pattern = pattern;
        }
        if let Some(name) = overrides.setter_namespace {
            self.setter_namespace = name;
        }
        if let Some(name) = overrides.deleter_namespace {
            self.deleter_namespace = name;
        }
        if let Some(ignore) = overrides.ignore_private_props {
            self.ignore_private_props = ignore;
        }
        if let Some(props) = overrides.ignore_props {
            self.ignore_props = props.into_iter().collect();
        }
        if let Some(enabled) = overrides.sync_integration {
            self.sync_integration = enabled;
        }
        self
    }

    /// Parse overrides from JSON and merge them over the defaults.
    ///
    /// ```
    /// use easy_access::{AccessConfig, Pattern};
    /// use serde_json::json;
    ///
    /// let conf = AccessConfig::from_overrides(json!({"pattern": "traditional"})).unwrap();
    /// assert_eq!(conf.pattern, Pattern::Traditional);
    /// assert_eq!(conf.setter_namespace, "set");
    /// ```
    pub fn from_overrides(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let overrides: ConfigOverrides = serde_json::from_value(value)?;
        Ok(Self::default().merge(overrides))
    }

    /// Whether synthesis should skip `key` reached at `full_path`.
    pub(crate) fn skips(&self, key: &str, full_path: &str) -> bool {
        (self.ignore_private_props && key.starts_with('_')) || self.ignore_props.contains(full_path)
    }
}

/// Caller-supplied overrides. Absent fields keep the base value.
///
/// ```
/// use easy_access::{AccessConfig, ConfigOverrides};
///
/// let conf = AccessConfig::default().merge(ConfigOverrides {
///     ignore_props: Some(vec!["user.token".into()]),
///     ..ConfigOverrides::default()
/// });
/// assert!(conf.ignore_props.contains("user.token"));
/// assert!(conf.ignore_private_props);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    /// Naming pattern for generated mutation names.
    pub pattern: Option<Pattern>,
    /// Sub-namespace the setter bundles register under.
    pub setter_namespace: Option<String>,
    /// Sub-namespace the deleter bundles register under.
    pub deleter_namespace: Option<String>,
    /// Skip keys starting with `_` during synthesis.
    pub ignore_private_props: Option<bool>,
    /// Full paths synthesis skips. Replaces the base set, it does not extend it.
    pub ignore_props: Option<Vec<String>>,
    /// Route writes and deletes of `_conf` modules to their bulk actions.
    pub sync_integration: Option<bool>,
}
