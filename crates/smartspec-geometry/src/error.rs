//! Error types for geometry extraction.

use thiserror::Error;

/// Errors that can occur while extracting geometry from a file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The file extension is not one of the recognized CAD formats.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// No coordinate records were found in the file.
    ///
    /// Never returned by [`crate::extract`]; the extractor substitutes the
    /// placeholder estimate instead.
    #[error("No usable geometry found")]
    EmptyGeometry,

    /// Estimator configuration out of range.
    #[error("Invalid estimator config: {0}")]
    InvalidConfig(String),

    /// Lexer error: unexpected character or malformed token in a STEP file.
    #[error("Lexer error at line {line}, column {col}: {message}")]
    Lexer {
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        col: usize,
        /// Error message.
        message: String,
    },
}

impl GeometryError {
    /// Create a lexer error.
    pub fn lexer(line: usize, col: usize, message: impl Into<String>) -> Self {
        Self::Lexer {
            line,
            col,
            message: message.into(),
        }
    }

    /// Create an unsupported-format error for the given extension.
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat(extension.into())
    }
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
