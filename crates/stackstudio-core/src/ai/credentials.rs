//! Provider credential lookup
//!
//! Immutable snapshot of environment-backed API keys, taken once at process
//! start. Absence of a key makes a provider unavailable; it is never an error
//! until a request actually targets that provider.

use std::collections::HashMap;

/// Snapshot of credential key/value pairs
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    keys: HashMap<String, String>,
}

impl Credentials {
    /// Snapshot the process environment
    ///
    /// Taken once at startup; later environment mutations are not observed.
    pub fn from_env() -> Self {
        Self {
            keys: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit pairs (tests, embedded deployments)
    pub fn from_map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            keys: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a credential by its key name; empty values count as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.keys
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether a non-empty credential is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
