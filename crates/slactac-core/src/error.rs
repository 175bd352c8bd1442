//! Error types for the engine's request APIs.

use thiserror::Error;

use slactac_protocols::StorageError;

/// Picker activation errors.
#[derive(Debug, Error)]
pub enum PickerError {
    #[error("Picker is not available on {0}")]
    UnsupportedHost(String),
}

/// Configuration surface errors.
#[derive(Debug, Error)]
pub enum TackError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Rejected unsafe replacement: {0}")]
    UnsafeValue(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
