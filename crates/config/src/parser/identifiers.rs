//! Identifier transforms for values of the form `name:payload`.
//!
//! Responsibilities:
//! - Keep an ordered registry of named transforms.
//! - Replace `name:payload` values with the transform output.
//! - Unwrap `name\:payload` escapes into `name:payload` without transforming.
//!
//! Does NOT handle:
//! - `$VAR` interpolation (see `interpolate.rs`), which runs first.
//!
//! Invariants:
//! - Identifier names are unique within a registry.
//! - Only an exact `name:` prefix matches; `name_other:payload` is untouched.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::EnvError;

/// A transform invoked with the payload after `name:`.
pub type IdentifierFn = dyn Fn(&str) -> anyhow::Result<String> + Send + Sync;

/// Registry of identifier transforms, checked in registration order.
///
/// Cloning is cheap; clones share the transform closures but not the
/// registration table.
#[derive(Clone, Default)]
pub struct IdentifierRegistry {
    transforms: IndexMap<String, Arc<IdentifierFn>>,
}

impl fmt::Debug for IdentifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierRegistry")
            .field("names", &self.transforms.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl IdentifierRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform under `name`.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::DuplicateIdentifier` if `name` is already registered.
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F) -> Result<(), EnvError>
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.transforms.contains_key(&name) {
            return Err(EnvError::DuplicateIdentifier(name));
        }
        self.transforms.insert(name, Arc::new(transform));
        Ok(())
    }

    /// Register a transform unless `name` is already taken.
    ///
    /// Returns `true` if the transform was registered.
    pub fn register_if_missing<F>(&mut self, name: impl Into<String>, transform: F) -> bool
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.transforms.contains_key(&name) {
            return false;
        }
        self.transforms.insert(name, Arc::new(transform));
        true
    }

    /// Remove the transform registered under `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        self.transforms.shift_remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Whether `raw` starts with a registered `name:` or `name\:` prefix.
    pub fn matches(&self, raw: &str) -> bool {
        self.transforms.keys().any(|name| {
            raw.strip_prefix(name.as_str())
                .is_some_and(|rest| rest.starts_with(':') || rest.starts_with("\\:"))
        })
    }

    /// Apply the first matching identifier to the resolved value of `key`.
    pub fn apply(&self, key: &str, value: String) -> Result<String, EnvError> {
        if !value.contains(':') {
            return Ok(value);
        }

        for (name, transform) in &self.transforms {
            let Some(rest) = value.strip_prefix(name.as_str()) else {
                continue;
            };

            if let Some(payload) = rest.strip_prefix(':') {
                tracing::debug!(key = %key, identifier = %name, "Applying identifier");
                return transform(payload).map_err(|source| EnvError::IdentifierFailed {
                    name: name.clone(),
                    key: key.to_string(),
                    source,
                });
            }

            if let Some(payload) = rest.strip_prefix("\\:") {
                return Ok(format!("{name}:{payload}"));
            }
        }

        Ok(value)
    }
}
