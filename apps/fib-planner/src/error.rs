//! Error types for the planner binary and library boundary.
//!
//! Invalid trade inputs are not errors here: they are reported as
//! [`ValidationErrors`](crate::plan::ValidationErrors) alongside a withheld
//! plan. This module covers failures that stop the program.
//!
//! # Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Plan produced |
//! | 2 | Inputs failed validation |
//! | 64 | Usage error (unknown field or command) |
//! | 74 | I/O or serialization failure |
//! | 78 | Configuration error |

use std::process::ExitCode;

use thiserror::Error;

use crate::config::ConfigError;
use crate::plan::UnknownFieldError;

/// Exit code when the inputs fail validation.
pub const EXIT_INVALID_INPUTS: u8 = 2;

/// Errors surfaced by the planner.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A field name was not recognized.
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),

    /// An interactive command was not recognized.
    #[error("unknown command '{0}' (type 'help' for a list)")]
    UnknownCommand(String),

    /// Reading input or writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::UnknownField(_) | Self::UnknownCommand(_) => 64,
            Self::Io(_) | Self::Json(_) => 74,
            Self::Config(_) => 78,
        }
    }

    /// Whether an interactive session can carry on after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownField(_) | Self::UnknownCommand(_))
    }
}

impl From<&PlannerError> for ExitCode {
    fn from(err: &PlannerError) -> Self {
        Self::from(err.exit_code())
    }
}

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
