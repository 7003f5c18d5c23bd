use models::errors::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Human-readable message for logs; the cause stays attached as the source.
    #[error("{message}")]
    Storage {
        message: String,
        #[source]
        source: StorageError,
    },
}

impl ServiceError {
    pub fn storage(message: impl Into<String>, source: StorageError) -> Self {
        Self::Storage { message: message.into(), source }
    }
}
