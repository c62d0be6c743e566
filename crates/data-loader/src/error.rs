//! Error types for the data-loader crate.
//!
//! Loading a candidate pool touches the filesystem and a JSON decoder, so
//! every failure carries the file it came from.

use thiserror::Error;

/// Errors that can occur while loading response pages and catalogs
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A file didn't decode as the expected JSON document
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// A data field had an invalid value
    ///
    /// `movie_id` identifies the offending record
    #[error("Invalid value for {field} on movie {movie_id}: {value}")]
    InvalidValue {
        movie_id: u32,
        field: String,
        value: String,
    },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
