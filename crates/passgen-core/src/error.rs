//! Error types for pass generation

use std::path::PathBuf;
use thiserror::Error;

use passgen_ooxml::OoxmlError;

/// Result type for pass generation
pub type Result<T> = std::result::Result<T, PassError>;

/// Errors that abort a generation request.
///
/// Recoverable conditions (no content left after filtering, PDF conversion
/// unavailable) are outcomes, not errors.
#[derive(Error, Debug)]
pub enum PassError {
    /// Pass-type choice outside 1, 2, 3
    #[error("Invalid choice '{0}'. Enter 1, 2 or 3.")]
    InvalidSelection(String),

    /// Pass count that is not an integer in 1..=MAX_PASS_COUNT
    #[error("Invalid number of passes '{0}'. Enter a whole number from 1 to 1000.")]
    InvalidCount(String),

    /// Template file does not exist
    #[error("Template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    /// Template file exists but is not a usable DOCX
    #[error("Template {} could not be read: {reason}", .path.display())]
    TemplateMalformed { path: PathBuf, reason: String },

    /// Rendering or composition failed
    #[error(transparent)]
    Document(#[from] OoxmlError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// The session has not been unlocked with the access key
    #[error("Access denied. Please enter the correct access key.")]
    AccessDenied,

    /// No access key is configured in the environment
    #[error("No access key configured; set the {0} environment variable")]
    AccessNotConfigured(String),
}
