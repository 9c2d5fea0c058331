#![forbid(unsafe_code)]

//! Error types raised while parsing arguments and dispatching commands
//!
//! Two families live here:
//! - [`CliError`]: runtime failures a user can trigger from the command line.
//!   Every variant carries a human-readable message and the process exit code
//!   the runner should terminate with.
//! - [`DefinitionError`]: mistakes made by the integrator while declaring a
//!   command tree. These surface from `build()` and never reach the user.

use std::io;
use thiserror::Error;

/// Exit code used when a failure does not specify one
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// Result alias for parsing and dispatch
pub type CliResult<T> = Result<T, CliError>;

/// Failures raised while parsing an argument vector or running a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// A token could not be converted to the declared type, or a path check failed
    #[error("{message}")]
    Parsing { message: String, exit_code: i32 },

    /// Positional slots were left unfilled at the end of the scan
    #[error("{message}")]
    ArgumentsMissing { message: String, exit_code: i32 },

    /// Unknown flag, reused flag, or a positional token with no slot left
    #[error("{message}")]
    ExtraArgument { message: String, exit_code: i32 },

    /// The dispatched handler terminated abnormally
    #[error("{message}")]
    RuntimeInterrupted { message: String, exit_code: i32 },
}

impl CliError {
    pub fn parsing(message: impl Into<String>) -> Self {
        CliError::Parsing {
            message: message.into(),
            exit_code: DEFAULT_EXIT_CODE,
        }
    }

    pub fn arguments_missing(message: impl Into<String>) -> Self {
        CliError::ArgumentsMissing {
            message: message.into(),
            exit_code: DEFAULT_EXIT_CODE,
        }
    }

    pub fn extra_argument(message: impl Into<String>) -> Self {
        CliError::ExtraArgument {
            message: message.into(),
            exit_code: DEFAULT_EXIT_CODE,
        }
    }

    pub fn runtime_interrupted(message: impl Into<String>) -> Self {
        CliError::RuntimeInterrupted {
            message: message.into(),
            exit_code: DEFAULT_EXIT_CODE,
        }
    }

    /// Replaces the exit code carried by this error
    pub fn with_exit_code(mut self, code: i32) -> Self {
        match &mut self {
            CliError::Parsing { exit_code, .. }
            | CliError::ArgumentsMissing { exit_code, .. }
            | CliError::ExtraArgument { exit_code, .. }
            | CliError::RuntimeInterrupted { exit_code, .. } => *exit_code = code,
        }
        self
    }

    /// Process exit code the runner terminates with
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Parsing { exit_code, .. }
            | CliError::ArgumentsMissing { exit_code, .. }
            | CliError::ExtraArgument { exit_code, .. }
            | CliError::RuntimeInterrupted { exit_code, .. } => *exit_code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CliError::Parsing { message, .. }
            | CliError::ArgumentsMissing { message, .. }
            | CliError::ExtraArgument { message, .. }
            | CliError::RuntimeInterrupted { message, .. } => message,
        }
    }

    /// Converts a handler failure into a framework error
    ///
    /// A handler that already returned a `CliError` keeps its variant and exit
    /// code; anything else becomes `RuntimeInterrupted` with exit code 1.
    pub fn from_handler(error: anyhow::Error) -> Self {
        match error.downcast::<CliError>() {
            Ok(cli_error) => cli_error,
            Err(other) => CliError::runtime_interrupted(format!("{:#}", other)),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        CliError::runtime_interrupted(format!("Failed to write output: {}", error))
    }
}

/// Mistakes in a command tree declaration, detected at build time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("Parameter `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("Flag `{flag}` of parameter `{name}` is already registered")]
    DuplicateFlag { name: String, flag: String },

    #[error("Flag `{flag}` of parameter `{name}` must start with `-`")]
    InvalidFlag { name: String, flag: String },

    #[error("Flag `{0}` is reserved by the framework")]
    ReservedFlag(String),

    #[error("Command `{0}` is already registered in this group")]
    DuplicateCommand(String),
}
