//! Layered dot-env loading, interpolation and validation.
//!
//! This crate reads an application's `.env` files in priority order,
//! expands `$VAR`/`${VAR}` references, merges the results into the ambient
//! environment and validates them against a typed schema.

pub mod ambient;
pub mod constants;
pub mod editor;
pub mod env;
pub mod error;
pub mod loader;
pub mod parser;
pub mod processor;
pub mod schema;
pub mod validator;

/// An ordered table of environment variable names to values.
pub type EnvMap = indexmap::IndexMap<String, String>;

pub use ambient::{Environment, MemoryEnvironment, SystemEnvironment};
pub use editor::{EditableFile, EnvEditor};
pub use env::Env;
pub use error::EnvError;
pub use loader::{CandidateFile, EnvLoader, OverridePathPolicy};
pub use parser::{EnvParser, IdentifierRegistry, Interpolator};
pub use processor::EnvProcessor;
pub use schema::{EnvValue, Rule, RuleError, StringFormat, UrlOptions};
pub use validator::{EnvValidator, Schema, ValidatedEnv, ValidationError};
