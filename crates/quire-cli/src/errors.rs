//! CLI-facing errors with exit codes and hints.

use std::fmt;

use quire_core::QuireError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (user, article, comment)
    NotFound { message: String, hint: String },

    /// Login failed
    AuthFailed(String),

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n\n{}", message, hint),
            CliError::AuthFailed(message) | CliError::InvalidInput(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed(_) => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }

    /// Print the error to stderr and exit with its code.
    pub fn exit(self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

/// Exit code for an error bubbling out of a command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<QuireError>() {
        Some(QuireError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(
            QuireError::DuplicateIdentity(_)
            | QuireError::WeakCredential { .. }
            | QuireError::InvalidInput(_)
            | QuireError::AlreadyInstalled
            | QuireError::CommentsDisabled,
        ) => exit_codes::INVALID_INPUT,
        _ => exit_codes::GENERAL,
    }
}
