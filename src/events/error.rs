//! Event store error types

use thiserror::Error;

/// Errors that can occur in the event store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Requested event does not exist
    #[error("Event not found: {0}")]
    NotFound(String),

    /// An event with this id is already stored
    #[error("Duplicate event id: {0}")]
    DuplicateId(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for event store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound("meal-1".to_string());
        assert_eq!(err.to_string(), "Event not found: meal-1");

        let err = StoreError::DuplicateId("mood-1".to_string());
        assert_eq!(err.to_string(), "Duplicate event id: mood-1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
