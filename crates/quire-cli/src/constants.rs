//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error
/// - 2: Misuse of shell command (clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unclassified failure.
    pub const GENERAL: i32 = 1;

    /// Resource not found (user, article, comment).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, including rejected passwords and taken usernames.
    pub const INVALID_INPUT: i32 = 4;

    /// Login failed.
    pub const AUTH_FAILED: i32 = 5;
}

/// Environment variable holding a password for non-interactive use.
pub const PASSWORD_ENV: &str = "QUIRE_PASSWORD";

/// Default tracing directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_DIRECTIVE: &str = "quire=info";
