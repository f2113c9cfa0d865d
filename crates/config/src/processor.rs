//! Multi-file dot-env processing.
//!
//! Responsibilities:
//! - Load every candidate file (see `loader.rs`) and parse it (see `parser`).
//! - Merge parsed values into one consolidated table, highest priority first.
//! - Write accepted values into the ambient environment.
//! - Own the identifier registry used while parsing.
//!
//! Does NOT handle:
//! - Validation or casting (see `validator.rs`).
//!
//! Invariants:
//! - First writer wins: a key set by a higher-priority file is never
//!   overwritten by a lower-priority one.
//! - Without `overwrite_existing`, a non-empty ambient value is adopted into
//!   the table and left untouched.
//! - Ambient values written here are always interpolated, never raw.

use std::path::{Path, PathBuf};

use crate::EnvMap;
use crate::ambient::Environment;
use crate::error::EnvError;
use crate::loader::{EnvLoader, OverridePathPolicy};
use crate::parser::{EnvParser, IdentifierRegistry};

/// Loads, parses and merges the dot-env files of an application.
#[derive(Debug, Clone)]
pub struct EnvProcessor {
    loader: EnvLoader,
    prefer_parsed: bool,
    overwrite_existing: bool,
    identifiers: IdentifierRegistry,
}

impl EnvProcessor {
    /// Create a processor for the application rooted at `app_root`.
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            loader: EnvLoader::new(app_root),
            prefer_parsed: false,
            overwrite_existing: false,
            identifiers: IdentifierRegistry::new(),
        }
    }

    /// Replace already-set ambient values with parsed ones.
    pub fn overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    /// Prefer values of the same file over ambient values when interpolating.
    pub fn prefer_parsed(mut self) -> Self {
        self.prefer_parsed = true;
        self
    }

    /// Set the policy for a missing `ENV_PATH` directory.
    pub fn with_override_policy(mut self, policy: OverridePathPolicy) -> Self {
        self.loader = self.loader.with_override_policy(policy);
        self
    }

    /// Read the current environment name from `name` instead of `NODE_ENV`.
    pub fn with_environment_var(mut self, name: impl Into<String>) -> Self {
        self.loader = self.loader.with_environment_var(name);
        self
    }

    pub fn app_root(&self) -> &Path {
        self.loader.app_root()
    }

    /// Register an identifier transform for `name:payload` values.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::DuplicateIdentifier` if `name` is already registered.
    pub fn register_identifier<F>(&mut self, name: impl Into<String>, transform: F) -> Result<(), EnvError>
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.identifiers.register(name, transform)
    }

    /// Remove the identifier registered under `name`.
    pub fn remove_identifier(&mut self, name: &str) -> bool {
        self.identifiers.remove(name)
    }

    pub fn identifiers(&self) -> &IdentifierRegistry {
        &self.identifiers
    }

    /// Process every candidate file and return the consolidated values.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails (see `EnvLoader::load`) or an
    /// identifier transform fails.
    pub fn process(&self, env: &dyn Environment) -> Result<EnvMap, EnvError> {
        let files = self.loader.load(env)?;

        tracing::debug!(
            files = ?files.iter().map(|file| file.path.display().to_string()).collect::<Vec<_>>(),
            "Processing .env files (priority from top to bottom)"
        );

        let parser = self.parser();
        let mut store = EnvMap::new();
        for file in &files {
            if file.contents.trim().is_empty() {
                continue;
            }
            let values = self.parse(&parser, &file.contents, env)?;
            tracing::debug!(
                path = %file.path.display(),
                keys = values.len(),
                "Parsed .env file"
            );
            self.merge(values, &mut store, env);
        }

        Ok(store)
    }

    /// Process a single dot-env blob without touching the filesystem.
    pub fn process_contents(&self, contents: &str, env: &dyn Environment) -> Result<EnvMap, EnvError> {
        let mut store = EnvMap::new();
        if contents.trim().is_empty() {
            return Ok(store);
        }
        let values = self.parse(&self.parser(), contents, env)?;
        self.merge(values, &mut store, env);
        Ok(store)
    }

    fn parser(&self) -> EnvParser {
        let parser = EnvParser::new().with_identifiers(self.identifiers.clone());
        if self.prefer_parsed {
            parser.prefer_parsed()
        } else {
            parser
        }
    }

    /// Overwriting needs each key's own file value, not the ambient one.
    fn parse(&self, parser: &EnvParser, contents: &str, env: &dyn Environment) -> Result<EnvMap, EnvError> {
        if self.overwrite_existing {
            parser.parse_own_values(contents, env)
        } else {
            parser.parse(contents, env)
        }
    }

    fn merge(&self, values: EnvMap, store: &mut EnvMap, env: &dyn Environment) {
        for (key, value) in values {
            if store.contains_key(&key) {
                continue;
            }

            let value = match env.get_non_empty(&key) {
                Some(existing) if !self.overwrite_existing => existing,
                _ => {
                    env.set(&key, &value);
                    value
                }
            };
            store.insert(key, value);
        }
    }
}
