//! Persistence errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage read failed for '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Storage write failed for '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn read(key: impl Into<String>, message: impl ToString) -> Self {
        Self::ReadFailed {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn write(key: impl Into<String>, message: impl ToString) -> Self {
        Self::WriteFailed {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_failed_error() {
        let err = StorageError::read("chatRoomOverrides", "quota exceeded");
        let display = err.to_string();
        assert!(display.contains("read failed"));
        assert!(display.contains("chatRoomOverrides"));
        assert!(display.contains("quota exceeded"));
    }

    #[test]
    fn test_write_failed_error() {
        let err = StorageError::write("lastPickedChannel", "disk full");
        let display = err.to_string();
        assert!(display.contains("write failed"));
        assert!(display.contains("disk full"));
    }

    #[test]
    fn test_serialization_error() {
        let err = StorageError::SerializationError("invalid JSON".to_string());
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_all_error_variants() {
        let errors: Vec<StorageError> = vec![
            StorageError::read("a", "b"),
            StorageError::write("c", "d"),
            StorageError::SerializationError("e".to_string()),
            StorageError::Unavailable("f".to_string()),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
