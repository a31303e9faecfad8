//! Error types for the storage module.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for key-value persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store directory could not be prepared.
    #[error("Initialization failed for {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a blob failed; the in-memory value is unaffected.
    #[error("Write of '{key}' failed: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error for file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn write(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Write {
            key: key.into(),
            source,
        }
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::write(
            "promo_library",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        );
        assert_eq!(err.to_string(), "Write of 'promo_library' failed: read-only");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let storage_err: StorageError = json_err.into();
        assert!(matches!(storage_err, StorageError::Serialization(_)));
    }
}
