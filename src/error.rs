//! Error types for the knurl CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for knurl operations.
///
/// The task-instructions and log-not-found conditions are distinct variants
/// so callers can match on them independently of generic failures.
#[derive(Error, Debug)]
pub enum KnurlError {
    /// A task was constructed without instructions.
    #[error("task instructions cannot be empty")]
    TaskInstructions,

    /// A task log file does not exist (logging never initialized, or the
    /// file was removed after the fact).
    #[error("log file '{}' not found", .0.display())]
    LogNotFound(PathBuf),

    /// Configuration resolution or validation failed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Agent spawn, execution, or timeout failure.
    #[error("agent execution failed: {0}")]
    Agent(String),

    /// User provided invalid arguments or the system is in an invalid state.
    #[error("{0}")]
    UserError(String),
}

impl KnurlError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            KnurlError::TaskInstructions => exit_codes::USER_ERROR,
            KnurlError::UserError(_) => exit_codes::USER_ERROR,
            KnurlError::Config(_) => exit_codes::CONFIG_FAILURE,
            KnurlError::Agent(_) => exit_codes::AGENT_FAILURE,
            KnurlError::LogNotFound(_) => exit_codes::LOG_FAILURE,
        }
    }
}

/// Result type alias for knurl operations.
pub type Result<T> = std::result::Result<T, KnurlError>;
