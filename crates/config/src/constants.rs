//! Centralized constants for dot-env loading.
//!
//! This module contains the file names and ambient variable names used
//! across the loader, processor and editor.

// =============================================================================
// Ambient Variables
// =============================================================================

/// Ambient variable relocating the directory dot-env files are read from.
pub const ENV_PATH_VAR: &str = "ENV_PATH";

/// Ambient variable naming the current environment (e.g. `production`).
pub const NODE_ENV_VAR: &str = "NODE_ENV";

/// Environment names for which `.env.local` is never loaded.
pub const TESTING_ENVIRONMENTS: &[&str] = &["test", "testing"];

// =============================================================================
// Dot-env File Names
// =============================================================================

/// The base dot-env file, always a candidate.
pub const DOTENV_FILE: &str = ".env";

/// Developer-local overrides.
pub const DOTENV_LOCAL_FILE: &str = ".env.local";

/// Template file, only loaded in editor mode.
pub const DOTENV_EXAMPLE_FILE: &str = ".env.example";

// =============================================================================
// Error Codes
// =============================================================================

/// Code of a required schema key without a value.
pub const E_MISSING_ENV_VALUE: &str = "E_MISSING_ENV_VALUE";

/// Code of a schema key whose value failed casting or format checks.
pub const E_INVALID_ENV_VALUE: &str = "E_INVALID_ENV_VALUE";

/// Code of the aggregated validation failure.
pub const E_INVALID_ENV_VARIABLES: &str = "E_INVALID_ENV_VARIABLES";
