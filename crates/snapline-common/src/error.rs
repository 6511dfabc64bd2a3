//! Error types for Snapline
//!
//! Every variant here is fatal to the run: per-record validation failures
//! are not an [`EtlError`], they are contained by the quarantine side
//! channel and never terminate the batch.

use thiserror::Error;

/// Result type alias for Snapline operations
pub type Result<T> = std::result::Result<T, EtlError>;

/// Main error type for Snapline
#[derive(Error, Debug)]
pub enum EtlError {
    /// Missing or malformed startup configuration (secret keyword, merge
    /// statement file). Raised before any record is read.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Archive open, entry lookup, or decryption failure.
    #[error("Archive error: {0}")]
    Archive(String),

    #[error("CSV error: {0}")]
    Csv(String),

    /// Database connect, bulk-load, or merge failure. The offending
    /// statement is logged at the call site before this is raised.
    #[error("Store error: {0}")]
    Store(String),

    /// A validation worker panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EtlError::Config("SNAPLINE_KEYWORD not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: SNAPLINE_KEYWORD not set");

        let err = EtlError::Store("COPY failed".to_string());
        assert_eq!(err.to_string(), "Store error: COPY failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EtlError = io.into();
        assert!(matches!(err, EtlError::Io(_)));
    }
}
