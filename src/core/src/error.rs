//! Unified error types for the posture workspace
//!
//! Subsystem crates define their own error enums and convert into
//! `CoreError` where a shared failure surface is needed.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for inventory data
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record could not be mapped onto a typed asset
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create an invalid error
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        CoreError::Invalid(msg.into())
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        CoreError::NotFound(msg.into())
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        CoreError::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let err = CoreError::invalid("test");
        assert!(matches!(err, CoreError::Invalid(_)));

        let err = CoreError::not_found("test");
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid("asset id cannot be empty");
        assert_eq!(err.to_string(), "Invalid: asset id cannot be empty");

        let err = CoreError::serialization("eof");
        assert_eq!(err.to_string(), "Serialization error: eof");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: CoreError = parse.unwrap_err().into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
