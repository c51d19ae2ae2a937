//! Error types for core operations.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core type construction and validation.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Invalid or unrepresentable calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Tenor string that cannot be normalized to `{integer}{M|Y}` form.
    #[error("Invalid tenor: '{input}' ({reason})")]
    InvalidTenor {
        /// The offending input string.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTenor {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
