//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(InfraError::Io { .. }) => exitcode::IOERR,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::Domain(DomainError::UnknownSidebar(_)) => exitcode::USAGE,
                ApplicationError::Domain(d) if d.is_reference_error() => exitcode::DATAERR,
                ApplicationError::Domain(_) | ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::UnsupportedFormat(_) => exitcode::CONFIG,
                ApplicationError::DocsDirNotFound(_) => exitcode::NOINPUT,
                ApplicationError::OperationFailed { .. } => exitcode::IOERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DanglingReference;
    use std::path::PathBuf;

    fn app(e: ApplicationError) -> CliError {
        CliError::from(e)
    }

    #[test]
    fn given_errors_when_mapping_exit_codes_then_follows_sysexits() {
        let dangling = DomainError::DanglingReferences(vec![DanglingReference {
            sidebar: "docs".into(),
            path: "docs[0]".into(),
            id: "intro".into(),
        }]);

        assert_eq!(app(dangling.into()).exit_code(), exitcode::DATAERR);
        assert_eq!(
            app(DomainError::schema("title", "is required").into()).exit_code(),
            exitcode::CONFIG
        );
        assert_eq!(
            app(ApplicationError::DocsDirNotFound(PathBuf::from("docs"))).exit_code(),
            exitcode::NOINPUT
        );
        assert_eq!(
            app(DomainError::UnknownSidebar("x".into()).into()).exit_code(),
            exitcode::USAGE
        );
        assert_eq!(
            CliError::Usage("site.toml exists".into()).exit_code(),
            exitcode::USAGE
        );
    }
}
