//! Error types for the Intently library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`IntentlyError`] enum. Load-time problems (a malformed corpus, an
//! artifact whose files disagree with each other) and degenerate training
//! data are reported through it; a prediction with no confident intent is
//! *not* an error and is represented by an empty ranking instead.
//!
//! # Examples
//!
//! ```
//! use intently::error::{IntentlyError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(IntentlyError::corpus("duplicate tag 'greeting'"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Intently operations.
#[derive(Error, Debug)]
pub enum IntentlyError {
    /// I/O errors (reading a corpus, writing an artifact, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary weight (de)serialization errors
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Matrix shape errors raised while rebuilding weights
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// The intents corpus violates its schema
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Training cannot proceed on the given data or configuration
    #[error("Training error: {0}")]
    Training(String),

    /// The persisted artifact is missing, inconsistent or unreadable
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// A vector or matrix does not have the width the network expects
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A tag that is not part of the label set was asked to be encoded
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with IntentlyError.
pub type Result<T> = std::result::Result<T, IntentlyError>;

impl IntentlyError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        IntentlyError::Analysis(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        IntentlyError::Corpus(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        IntentlyError::Training(msg.into())
    }

    /// Create a new artifact error.
    pub fn artifact<S: Into<String>>(msg: S) -> Self {
        IntentlyError::Artifact(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        IntentlyError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        IntentlyError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = IntentlyError::corpus("Test corpus error");
        assert_eq!(error.to_string(), "Corpus error: Test corpus error");

        let error = IntentlyError::training("Test training error");
        assert_eq!(error.to_string(), "Training error: Test training error");

        let error = IntentlyError::artifact("Test artifact error");
        assert_eq!(error.to_string(), "Artifact error: Test artifact error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = IntentlyError::from(io_error);

        match error {
            IntentlyError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
