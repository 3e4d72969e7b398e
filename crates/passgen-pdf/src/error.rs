//! Error types for PDF export

use std::path::PathBuf;
use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur while running an external converter
#[derive(Error, Debug)]
pub enum PdfError {
    /// The converter program is not installed or not on PATH
    #[error("{0} is not installed in this environment")]
    ToolNotFound(String),

    /// The converter ran but reported failure
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// The converter did not finish in time and was killed
    #[error("{tool} timed out after {secs}s")]
    TimedOut { tool: String, secs: u64 },

    /// The converter exited successfully without producing the expected file
    #[error("converter produced no output at {0}")]
    MissingOutput(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
