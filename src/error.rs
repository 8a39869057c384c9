//! Error types for boundkv

use std::io;
use thiserror::Error;

/// The main error type for boundkv operations
///
/// Exhausted ranges, negative offsets and zero limits are never errors: they
/// surface as an iterator that is not valid. An `Error` always means the
/// storage engine itself failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(String),

    /// Storage corruption detected by the engine
    #[error("Corruption detected: {details}")]
    Corruption {
        /// Description of the corruption
        details: String,
    },

    /// Configuration could not be parsed or is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for boundkv operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}
