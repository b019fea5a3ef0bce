//! Error types for gemini-wrapped
//!
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gemini-wrapped operations
#[derive(Error, Debug)]
pub enum WrappedError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// No Gemini CLI data directory found
    #[error("Gemini CLI data not found in ~/.gemini/tmp")]
    NoGeminiDirectory,

    /// Requested a year that has not started yet
    #[error("The year {0} hasn't started yet!")]
    YearNotStarted(i32),

    /// Invalid timezone string
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Parse error with file context
    #[error("Parse error in {file}: {error}")]
    Parse {
        /// The file that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },
}

/// Convenience type alias for Results in gemini-wrapped
pub type Result<T> = std::result::Result<T, WrappedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = WrappedError::NoGeminiDirectory;
        assert_eq!(
            error.to_string(),
            "Gemini CLI data not found in ~/.gemini/tmp"
        );

        let error = WrappedError::YearNotStarted(2099);
        assert_eq!(error.to_string(), "The year 2099 hasn't started yet!");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let wrapped: WrappedError = io_error.into();
        assert!(matches!(wrapped, WrappedError::Io(_)));
    }
}
