//! The serialization boundary's error type.

use thiserror::Error;

/// Errors crossing the file boundary.
///
/// Loading is all-or-nothing: any of these means the graph in memory is
/// still exactly what it was before the load was attempted. Parser
/// errors from the XML layer are stringified into [`FileError::Malformed`]
/// here so callers never see a parser type.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file is not a well-formed document of the expected format.
    #[error("Malformed file: {0}")]
    Malformed(String),

    /// JSON (de)serialization failed.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// CSV writing failed.
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for FileError {
    fn from(err: quick_xml::Error) -> Self {
        FileError::Malformed(err.to_string())
    }
}

/// A specialized `Result` type for serialization operations.
pub type Result<T> = std::result::Result<T, FileError>;
