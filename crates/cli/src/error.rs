//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map EnvError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).

use envlayer_config::EnvError;

/// Structured exit codes for envlayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Validation failed - one or more variables broke their rule.
    ///
    /// Scripts should fix the environment and not retry unchanged.
    ValidationFailed = 3,

    /// I/O error - a dot-env file or the ENV_PATH directory is unusable.
    IoError = 4,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&EnvError> for ExitCode {
    fn from(err: &EnvError) -> Self {
        match err {
            EnvError::Validation(_) => ExitCode::ValidationFailed,

            EnvError::Io { .. } | EnvError::Write { .. } | EnvError::MissingOverridePath { .. } => {
                ExitCode::IoError
            }

            EnvError::MalformedLine { .. }
            | EnvError::DuplicateIdentifier(_)
            | EnvError::IdentifierFailed { .. } => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no EnvError is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<EnvError>())
            .map_or(ExitCode::GeneralError, ExitCode::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::ValidationFailed.as_i32(), 3);
        assert_eq!(ExitCode::IoError.as_i32(), 4);
    }

    #[test]
    fn test_io_errors_map_to_io_exit_code() {
        let err = EnvError::MissingOverridePath {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::IoError);
    }

    #[test]
    fn test_exit_code_found_through_context() {
        let err = Err::<(), _>(EnvError::MissingOverridePath {
            path: PathBuf::from("/missing"),
        })
        .context("Failed to load env files")
        .unwrap_err();

        assert_eq!(err.exit_code(), ExitCode::IoError);
    }

    #[test]
    fn test_other_errors_are_general() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);

        let err = anyhow::Error::from(EnvError::DuplicateIdentifier("file".to_string()));
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }
}
