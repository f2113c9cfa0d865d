//! Error types for dot-env loading, parsing and validation.
//!
//! Responsibilities:
//! - Define error variants for every fatal loading/parsing failure.
//! - Wrap aggregated schema failures (`ValidationError`) for unified handling.
//!
//! Does NOT handle:
//! - Per-key rule failures (see `schema::RuleError`).
//!
//! Invariants:
//! - All error variants include context for debugging (paths, line numbers, names).
//! - Errors NEVER include raw dot-env line contents to prevent secret leakage.

use std::path::PathBuf;
use thiserror::Error;

use crate::validator::ValidationError;

/// Errors that can occur while loading, parsing or validating env variables.
#[derive(Error, Debug)]
pub enum EnvError {
    /// A non-blank, non-comment line has no `=` or an empty key.
    ///
    /// SAFETY: Only the 1-based line number is reported, NOT the line content.
    #[error("Malformed line {line} in dot-env contents: expected KEY=VALUE")]
    MalformedLine { line: usize },

    #[error("The identifier \"{0}\" is already defined")]
    DuplicateIdentifier(String),

    #[error("Identifier \"{name}\" failed to transform the value of {key}")]
    IdentifierFailed {
        name: String,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// `ENV_PATH` points to a directory that does not exist.
    #[error("Cannot find env files directory from \"ENV_PATH\": {path}")]
    MissingOverridePath { path: PathBuf },

    #[error("Failed to read env file at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write env file at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
