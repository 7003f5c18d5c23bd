use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::errors::StorageError;
use models::{count, Count};

/// Data access seam for the `count` table.
///
/// Mutations that target an id return `None` when no row matched; the check and
/// the write happen in one statement, so a concurrent delete cannot slip between them.
#[async_trait]
pub trait CountRepository: Send + Sync {
    /// Every row ordered by `updated_at` descending.
    async fn find_all(&self) -> Result<Vec<Count>, StorageError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Count>, StorageError>;
    async fn create(&self, value: i32) -> Result<Count, StorageError>;
    async fn update(&self, id: i32, value: i32) -> Result<Option<Count>, StorageError>;
    /// Returns the row as it was just before removal.
    async fn delete(&self, id: i32) -> Result<Option<Count>, StorageError>;
    async fn increment_or_decrement(&self, id: i32, delta: i32) -> Result<Option<Count>, StorageError>;
    /// Drop every row, then insert `values` in order.
    async fn reset(&self, values: &[i32]) -> Result<Vec<Count>, StorageError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmCountRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCountRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl CountRepository for SeaOrmCountRepository {
    async fn find_all(&self) -> Result<Vec<Count>, StorageError> {
        count::find_all(&self.db).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Count>, StorageError> {
        count::find_by_id(&self.db, id).await
    }

    async fn create(&self, value: i32) -> Result<Count, StorageError> {
        count::create(&self.db, value).await
    }

    async fn update(&self, id: i32, value: i32) -> Result<Option<Count>, StorageError> {
        count::update(&self.db, id, value).await
    }

    async fn delete(&self, id: i32) -> Result<Option<Count>, StorageError> {
        count::delete(&self.db, id).await
    }

    async fn increment_or_decrement(&self, id: i32, delta: i32) -> Result<Option<Count>, StorageError> {
        count::increment_or_decrement(&self.db, id, delta).await
    }

    async fn reset(&self, values: &[i32]) -> Result<Vec<Count>, StorageError> {
        count::reset(&self.db, values).await
    }
}
