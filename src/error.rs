//! Error types
//!
//! The analyzers themselves are total; only I/O around them can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(u64),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Serialization(e.to_string())
    }
}

/// Result type for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
