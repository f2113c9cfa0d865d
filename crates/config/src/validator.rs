//! Schema validation over a table of environment values.
//!
//! Responsibilities:
//! - Hold an ordered schema of per-key rules.
//! - Validate every schema key in one pass and aggregate all failures.
//!
//! Does NOT handle:
//! - Individual rule semantics (see `schema`).
//!
//! Invariants:
//! - A non-empty ambient value wins over the supplied value for a key.
//! - All-or-nothing: any failure yields a `ValidationError` and no values.
//! - Failures are reported in schema declaration order.
//! - Keys outside the schema pass through as strings.

use indexmap::IndexMap;
use thiserror::Error;

use crate::EnvMap;
use crate::ambient::Environment;
use crate::constants::E_INVALID_ENV_VARIABLES;
use crate::error::EnvError;
use crate::schema::{EnvValue, Rule, RuleError};

/// Validated values, in input order followed by schema-only keys.
pub type ValidatedEnv = IndexMap<String, EnvValue>;

/// One or more schema rules failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed for one or more environment variables\n{}", self.help())]
pub struct ValidationError {
    failures: Vec<RuleError>,
}

impl ValidationError {
    pub fn failures(&self) -> &[RuleError] {
        &self.failures
    }

    /// One `- <message>` line per failure.
    pub fn help(&self) -> String {
        self.failures
            .iter()
            .map(|failure| format!("- {failure}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn code(&self) -> &'static str {
        E_INVALID_ENV_VARIABLES
    }
}

/// An ordered mapping of keys to rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: IndexMap<String, Rule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the rule for `key`.
    pub fn rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(key, rule)| (key.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Rule)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, Rule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|(key, rule)| (key.into(), rule)).collect(),
        }
    }
}

/// Validates environment values against a [`Schema`].
#[derive(Debug, Clone)]
pub struct EnvValidator {
    schema: Schema,
}

impl EnvValidator {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate `values`, preferring non-empty ambient values for schema keys.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Validation` listing every failing rule.
    pub fn validate(&self, values: &EnvMap, env: &dyn Environment) -> Result<ValidatedEnv, EnvError> {
        let mut validated: ValidatedEnv = values
            .iter()
            .map(|(key, value)| (key.clone(), EnvValue::String(value.clone())))
            .collect();
        let mut failures = Vec::new();

        for (key, rule) in self.schema.iter() {
            let candidate = env
                .get_non_empty(key)
                .or_else(|| values.get(key).cloned());

            match rule.validate(key, candidate.as_deref()) {
                Ok(Some(value)) => {
                    validated.insert(key.to_string(), value);
                }
                Ok(None) => {
                    validated.shift_remove(key);
                }
                Err(failure) => failures.push(failure),
            }
        }

        if !failures.is_empty() {
            tracing::debug!(failures = failures.len(), "Environment validation failed");
            return Err(ValidationError { failures }.into());
        }

        Ok(validated)
    }
}
