//! Environment mapping handed to the override engine.
//!
//! The engine never reads the process environment itself: callers build an
//! `EnvVars` from a map, a fixture, or a one-time snapshot of the process
//! environment (`EnvVars::from_std_env`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value environment mapping where a value may be absent.
///
/// Backed by a `BTreeMap`, so iteration order (and therefore which entry
/// wins when two keys translate to the same property) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvVars(BTreeMap<String, Option<String>>);

impl EnvVars {
    /// Empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a mapping from `(key, value)` pairs (useful for tests and fixtures).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(key, value)| (key.into(), Some(value.into())))
            .collect()
    }

    /// Build a mapping from a plain string map.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        map.iter()
            .map(|(key, value)| (key.clone(), Some(value.clone())))
            .collect()
    }

    /// Snapshot the current process environment.
    ///
    /// Entries whose key or value is not valid Unicode are skipped.
    #[must_use]
    pub fn from_std_env() -> Self {
        let mut vars = Self::new();
        for (key, value) in std::env::vars_os() {
            let (Some(key), Some(value)) = (key.to_str(), value.to_str()) else {
                tracing::debug!(
                    key = %key.to_string_lossy(),
                    "skipping non-unicode environment entry"
                );
                continue;
            };
            vars.insert(key, value);
        }
        vars
    }

    /// Insert a key with a value, returning the previous entry.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<Option<String>> {
        self.0.insert(key.into(), Some(value.into()))
    }

    /// Insert a key that carries no value, returning the previous entry.
    pub fn insert_unset(&mut self, key: impl Into<String>) -> Option<Option<String>> {
        self.0.insert(key.into(), None)
    }

    /// Look up a key. `Some(None)` means the key is present without a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.0.get(key).map(Option::as_deref)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Option<String>)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, Option<String>)> for EnvVars {
    fn extend<I: IntoIterator<Item = (String, Option<String>)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl From<BTreeMap<String, Option<String>>> for EnvVars {
    fn from(map: BTreeMap<String, Option<String>>) -> Self {
        Self(map)
    }
}
