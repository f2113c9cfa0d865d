//! Typed accessor over validated environment values.
//!
//! Responsibilities:
//! - Cache validated values and fall back to the ambient environment.
//! - Provide `Env::create`, which processes dot-env files and validates them.
//!
//! Does NOT handle:
//! - Re-validating values passed to `Env::set`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::ambient::Environment;
use crate::error::EnvError;
use crate::processor::EnvProcessor;
use crate::schema::EnvValue;
use crate::validator::{EnvValidator, Schema, ValidatedEnv};

/// Validated environment values backed by an ambient environment.
///
/// ```
/// use std::sync::Arc;
/// use envlayer_config::{Env, MemoryEnvironment, Schema, schema};
///
/// let ambient = Arc::new(MemoryEnvironment::new());
/// let env = Env::create(
///     "/path/that/has/no/dotfiles",
///     &Schema::new().rule("PORT", schema::number().optional()),
///     ambient,
/// )
/// .unwrap();
///
/// assert_eq!(env.get_number("PORT"), None);
/// ```
pub struct Env {
    values: ValidatedEnv,
    environment: Arc<dyn Environment>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Env {
    pub fn new(values: ValidatedEnv, environment: Arc<dyn Environment>) -> Self {
        Self {
            values,
            environment,
        }
    }

    /// Process the dot-env files of `app_root` and validate them with `schema`.
    ///
    /// # Errors
    ///
    /// Returns any processing error, or `EnvError::Validation` if a rule fails.
    pub fn create(
        app_root: impl Into<PathBuf>,
        schema: &Schema,
        environment: Arc<dyn Environment>,
    ) -> Result<Self, EnvError> {
        Self::create_with(&EnvProcessor::new(app_root), schema, environment)
    }

    /// Same as [`Env::create`], with a configured processor.
    pub fn create_with(
        processor: &EnvProcessor,
        schema: &Schema,
        environment: Arc<dyn Environment>,
    ) -> Result<Self, EnvError> {
        let values = processor.process(environment.as_ref())?;
        let validated = Self::rules(schema.clone()).validate(&values, environment.as_ref())?;
        tracing::debug!(keys = validated.len(), "Environment loaded");
        Ok(Self::new(validated, environment))
    }

    /// A validator for `schema`.
    pub fn rules(schema: Schema) -> EnvValidator {
        EnvValidator::new(schema)
    }

    /// The cached value, else the non-empty ambient value.
    pub fn get(&self, key: &str) -> Option<EnvValue> {
        if let Some(value) = self.values.get(key) {
            return Some(value.clone());
        }
        self.environment.get_non_empty(key).map(EnvValue::String)
    }

    pub fn get_or(&self, key: &str, default: impl Into<EnvValue>) -> EnvValue {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// The value as a string, in its display form for typed values.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.to_string())
    }

    /// The value as a number, parsing ambient strings when needed.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            EnvValue::Number(value) => Some(value),
            EnvValue::String(value) => value.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            EnvValue::Bool(_) => None,
        }
    }

    /// The value as a boolean; strings accept `1`/`true` and `0`/`false`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            EnvValue::Bool(value) => Some(value),
            EnvValue::String(value) => match value.as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            EnvValue::Number(_) => None,
        }
    }

    /// Cache `value` and write its string form to the ambient environment.
    pub fn set(&mut self, key: &str, value: impl Into<EnvValue>) {
        let value = value.into();
        self.environment.set(key, &value.to_string());
        self.values.insert(key.to_string(), value);
    }

    pub fn values(&self) -> &ValidatedEnv {
        &self.values
    }
}
