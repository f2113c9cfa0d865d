//! Dot-env parsing: decode, interpolate, then apply identifiers.
//!
//! Responsibilities:
//! - Decode dot-env contents into a raw table.
//! - Resolve every key against that raw table and the ambient environment.
//! - Run identifier transforms on the resolved values.
//!
//! Does NOT handle:
//! - Reading files (see `loader.rs`).
//! - Writing results to the ambient environment (see `processor.rs`).
//!
//! Invariants / Assumptions:
//! - Each key is resolved as if referenced, so with the default configuration
//!   an already-set, non-empty ambient value is the parsed result.
//! - Identifiers apply only when a key's own raw value carries the `name:`
//!   prefix, never to values reached through a reference.

mod decoder;
mod identifiers;
mod interpolate;

pub use decoder::{decode, try_decode};
pub use identifiers::{IdentifierFn, IdentifierRegistry};
pub use interpolate::Interpolator;

use crate::EnvMap;
use crate::ambient::Environment;
use crate::error::EnvError;

/// Parses dot-env contents into interpolated key/value pairs.
///
/// ```
/// use envlayer_config::{EnvParser, MemoryEnvironment};
///
/// let env = MemoryEnvironment::new();
/// let parsed = EnvParser::new()
///     .parse("HOST=127.0.0.1\nPORT=3333\nURL=http://$HOST:$PORT", &env)
///     .unwrap();
///
/// assert_eq!(parsed["URL"], "http://127.0.0.1:3333");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvParser {
    interpolator: Interpolator,
    identifiers: IdentifierRegistry,
}

impl EnvParser {
    /// Create a parser preferring ambient values, with no identifiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer values parsed from the same contents over ambient values.
    pub fn prefer_parsed(mut self) -> Self {
        self.interpolator = self.interpolator.prefer_parsed();
        self
    }

    /// Use `identifiers` for `name:payload` values.
    pub fn with_identifiers(mut self, identifiers: IdentifierRegistry) -> Self {
        self.identifiers = identifiers;
        self
    }

    pub fn interpolator(&self) -> Interpolator {
        self.interpolator
    }

    /// Parse `contents` into resolved values, in file order.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::IdentifierFailed` if an identifier transform fails.
    /// Malformed lines are skipped, never reported as errors.
    pub fn parse(&self, contents: &str, env: &dyn Environment) -> Result<EnvMap, EnvError> {
        let raw = decode(contents);
        self.resolve_table(&raw, env)
    }

    /// Resolve every key of an already-decoded raw table.
    pub fn resolve_table(&self, raw: &EnvMap, env: &dyn Environment) -> Result<EnvMap, EnvError> {
        self.resolve_with(raw, |key| self.interpolator.resolve(key, raw, env))
    }

    /// Parse `contents` like [`EnvParser::parse`], but interpolate each key's
    /// own raw value instead of taking an already-set ambient value.
    ///
    /// References inside the values keep the configured precedence.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::IdentifierFailed` if an identifier transform fails.
    pub fn parse_own_values(&self, contents: &str, env: &dyn Environment) -> Result<EnvMap, EnvError> {
        let raw = decode(contents);
        self.resolve_with(&raw, |key| self.interpolator.expand(key, &raw, env))
    }

    fn resolve_with(
        &self,
        raw: &EnvMap,
        resolve: impl Fn(&str) -> String,
    ) -> Result<EnvMap, EnvError> {
        let mut resolved = EnvMap::with_capacity(raw.len());
        for (key, raw_value) in raw {
            let value = resolve(key.as_str());
            let value = if self.identifiers.matches(raw_value) {
                self.identifiers.apply(key, value)?
            } else {
                value
            };
            resolved.insert(key.clone(), value);
        }
        Ok(resolved)
    }
}
