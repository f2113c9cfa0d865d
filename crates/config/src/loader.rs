//! Layered dot-env file loader.
//!
//! Responsibilities:
//! - Determine the ordered list of candidate dot-env files for an app root.
//! - Read each candidate, reporting missing files as empty.
//! - Honor `ENV_PATH` (base directory override) and `NODE_ENV` (current
//!   environment) from the ambient environment.
//!
//! Does NOT handle:
//! - Parsing or merging file contents (see `processor.rs`).
//!
//! Invariants:
//! - Candidates are returned highest priority first:
//!   `.env.<env>.local`, `.env.local`, `.env.<env>`, `.env`, `.env.example`.
//! - Every applicable candidate is returned whether or not it exists.
//! - `.env.local` is skipped for the testing environments.
//! - Only "not found" is tolerated; every other I/O error is fatal.
//! - Files are read sequentially in priority order.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ambient::Environment;
use crate::constants::{
    DOTENV_EXAMPLE_FILE, DOTENV_FILE, DOTENV_LOCAL_FILE, ENV_PATH_VAR, NODE_ENV_VAR,
    TESTING_ENVIRONMENTS,
};
use crate::error::EnvError;

/// What to do when `ENV_PATH` points to a directory that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverridePathPolicy {
    /// Fail with `EnvError::MissingOverridePath`.
    #[default]
    Strict,
    /// Treat the directory as empty.
    Lenient,
}

/// A candidate dot-env file and its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// Empty when the file does not exist.
    pub contents: String,
    pub exists: bool,
}

impl CandidateFile {
    /// The file name, e.g. `.env.local`.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// Reads the dot-env files of an application.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    app_root: PathBuf,
    include_example: bool,
    override_policy: OverridePathPolicy,
    environment_var: String,
}

impl EnvLoader {
    /// Create a loader for the application rooted at `app_root`.
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
            include_example: false,
            override_policy: OverridePathPolicy::default(),
            environment_var: NODE_ENV_VAR.to_string(),
        }
    }

    /// Also return `.env.example` as the lowest priority candidate.
    pub fn include_example(mut self, include: bool) -> Self {
        self.include_example = include;
        self
    }

    /// Set the policy for a missing `ENV_PATH` directory.
    pub fn with_override_policy(mut self, policy: OverridePathPolicy) -> Self {
        self.override_policy = policy;
        self
    }

    /// Read the current environment name from `name` instead of `NODE_ENV`.
    pub fn with_environment_var(mut self, name: impl Into<String>) -> Self {
        self.environment_var = name.into();
        self
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    /// The directory dot-env files are read from.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::MissingOverridePath` under the strict policy when
    /// `ENV_PATH` is set to a directory that does not exist.
    pub fn base_dir(&self, env: &dyn Environment) -> Result<PathBuf, EnvError> {
        let Some(env_path) = env.get_non_empty(ENV_PATH_VAR) else {
            return Ok(self.app_root.clone());
        };

        let env_path = Path::new(&env_path);
        let base = if env_path.is_absolute() {
            env_path.to_path_buf()
        } else {
            self.app_root.join(env_path)
        };

        if !base.is_dir() {
            match self.override_policy {
                OverridePathPolicy::Strict => {
                    return Err(EnvError::MissingOverridePath { path: base });
                }
                OverridePathPolicy::Lenient => {
                    tracing::debug!(path = %base.display(), "ENV_PATH directory does not exist");
                }
            }
        }

        Ok(base)
    }

    /// Candidate paths, highest priority first.
    pub fn candidate_paths(&self, env: &dyn Environment) -> Result<Vec<PathBuf>, EnvError> {
        let base = self.base_dir(env)?;
        let current_env = env.get_non_empty(&self.environment_var);
        let mut paths = Vec::with_capacity(5);

        if let Some(name) = &current_env {
            paths.push(base.join(format!(".env.{name}.local")));
        }

        let is_testing = current_env
            .as_deref()
            .is_some_and(|name| TESTING_ENVIRONMENTS.contains(&name));
        if !is_testing {
            paths.push(base.join(DOTENV_LOCAL_FILE));
        }

        if let Some(name) = &current_env {
            paths.push(base.join(format!(".env.{name}")));
        }

        paths.push(base.join(DOTENV_FILE));

        if self.include_example {
            paths.push(base.join(DOTENV_EXAMPLE_FILE));
        }

        Ok(paths)
    }

    /// Read every candidate file, highest priority first.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENV_PATH` is missing (strict policy) or a
    /// candidate exists but cannot be read.
    pub fn load(&self, env: &dyn Environment) -> Result<Vec<CandidateFile>, EnvError> {
        self.candidate_paths(env)?
            .into_iter()
            .map(|path| {
                let contents = read_optional(&path)?;
                Ok(CandidateFile {
                    exists: contents.is_some(),
                    contents: contents.unwrap_or_default(),
                    path,
                })
            })
            .collect()
    }
}

/// Read a file, returning `None` if it does not exist.
fn read_optional(path: &Path) -> Result<Option<String>, EnvError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(EnvError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
