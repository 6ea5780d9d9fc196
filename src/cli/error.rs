//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Tree(_) => crate::exitcode::SOFTWARE,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::InvalidRange { .. } => crate::exitcode::DATAERR,
            },
        }
    }
}

impl From<crate::domain::TreeError> for CliError {
    fn from(e: crate::domain::TreeError) -> Self {
        CliError::Application(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::InvalidArgs("x".into()).exit_code(), 64);
        assert_eq!(CliError::from(TreeError::inconsistency("x")).exit_code(), 70);
        let range = ApplicationError::InvalidRange { min: 1, max: 0 };
        assert_eq!(CliError::from(range).exit_code(), 65);
        let config = ApplicationError::Config {
            message: "x".into(),
        };
        assert_eq!(CliError::from(config).exit_code(), 78);
    }
}
