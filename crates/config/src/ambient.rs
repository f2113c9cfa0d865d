//! The ambient environment table.
//!
//! Responsibilities:
//! - Abstract the process-wide key/value table behind the `Environment` trait.
//! - Provide the real process table (`SystemEnvironment`) and an isolated,
//!   shareable in-memory table (`MemoryEnvironment`).
//!
//! Does NOT handle:
//! - Precedence rules (see `parser::interpolate` and `processor`).
//!
//! Invariants:
//! - Empty values are treated as unset by `get_non_empty`; callers that need
//!   the raw presence check use `get`.
//! - Implementations are `Send + Sync` so one table can back several
//!   components at once.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A mutable key/value table of environment variables.
pub trait Environment: Send + Sync {
    /// Returns the value of `key`, including empty values.
    fn get(&self, key: &str) -> Option<String>;

    /// Sets `key` to `value`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Removes `key` from the table.
    fn remove(&self, key: &str);

    /// Returns the value of `key`, or `None` if it is unset or empty.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty())
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        // Keys containing '=' or NUL can never be set, and non-unicode
        // values cannot be represented in the tables this crate produces.
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        std::env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if key.is_empty() || key.contains(['=', '\0']) || value.contains('\0') {
            tracing::warn!(key = %key, "Skipping environment variable that cannot be set");
            return;
        }
        // SAFETY: dot-env loading is a startup operation; callers must not
        // run it while other threads read the process environment.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if key.is_empty() || key.contains(['=', '\0']) {
            return;
        }
        // SAFETY: see `set`.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

/// An in-memory environment table.
///
/// Clones share the same underlying table, so a clone handed to a processor
/// observes every write made through another clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    vars: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryEnvironment {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a sorted copy of every entry.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let vars = self.vars.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<_> = vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        entries.sort();
        entries
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            vars: Arc::new(RwLock::new(vars)),
        }
    }
}

impl Environment for MemoryEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl<E: Environment + ?Sized> Environment for Arc<E> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
