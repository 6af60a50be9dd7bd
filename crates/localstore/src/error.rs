//! Storage error types

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend failed or rejected an operation.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid plugin or adapter configuration, raised at setup time.
    #[error("Configuration error: {0}")]
    Config(String),
}
