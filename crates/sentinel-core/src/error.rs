//! Error types for the sentinel screening engine.

use thiserror::Error;

/// Result type alias using the engine's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sentinel operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed request: bad query params, conflicting job submission fields,
    /// out-of-range config.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single NDJSON line could not be parsed. Recorded and skipped; never
    /// surfaced to the caller directly.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Object-store read/write failed.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Unexpected exception while scoring a single item.
    #[error("Scoring error: {0}")]
    ScoringError(String),

    /// Resource not found (unknown job id).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uncaught exception in the worker itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedRecord(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::StorageUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("both items and s3InputPath set".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: both items and s3InputPath set"
        );
    }

    #[test]
    fn test_error_display_malformed_record() {
        let err = Error::MalformedRecord("unexpected token".to_string());
        assert_eq!(err.to_string(), "Malformed record: unexpected token");
    }

    #[test]
    fn test_error_display_storage_unavailable() {
        let err = Error::StorageUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Storage unavailable: connection refused");
    }

    #[test]
    fn test_error_display_scoring_error() {
        let err = Error::ScoringError("division by zero".to_string());
        assert_eq!(err.to_string(), "Scoring error: division by zero");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("job 123".to_string());
        assert_eq!(err.to_string(), "Not found: job 123");
    }

    #[test]
    fn test_error_display_internal() {
        let err = Error::Internal("unexpected state".to_string());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::MalformedRecord(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::StorageUnavailable(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::NotFound("x".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("NotFound"));
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
