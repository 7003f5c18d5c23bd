use thiserror::Error;

/// Failure of a single storage statement. Never caught in this crate.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}
