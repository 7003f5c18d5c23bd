use std::sync::Arc;

use tracing::{error, info, instrument};

use models::errors::StorageError;
use models::Count;

use crate::count::repository::CountRepository;
use crate::errors::ServiceError;

/// Values written by the out-of-band fixture loader, in insertion order.
pub const SEED_VALUES: [i32; 5] = [0, 10, 25, 50, 100];

/// Application service over counts.
/// Absence is `Ok(None)`, never an error; storage failures are logged and wrapped.
#[derive(Clone)]
pub struct CountService {
    repo: Arc<dyn CountRepository>,
}

impl CountService {
    pub fn new(repo: Arc<dyn CountRepository>) -> Self { Self { repo } }

    pub async fn get_all_counts(&self) -> Result<Vec<Count>, ServiceError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| fail(e, "Failed to get counts".to_string()))
    }

    pub async fn get_count_by_id(&self, id: i32) -> Result<Option<Count>, ServiceError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| fail(e, format!("Failed to get count with id {id}")))
    }

    #[instrument(skip(self))]
    pub async fn create_count(&self, value: i32) -> Result<Count, ServiceError> {
        let created = self
            .repo
            .create(value)
            .await
            .map_err(|e| fail(e, "Failed to create count".to_string()))?;
        info!(id = created.id, value = created.value, "count created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update_count(&self, id: i32, value: i32) -> Result<Option<Count>, ServiceError> {
        self.repo
            .update(id, value)
            .await
            .map_err(|e| fail(e, format!("Failed to update count with id {id}")))
    }

    /// The returned row is the state just before removal.
    #[instrument(skip(self))]
    pub async fn delete_count(&self, id: i32) -> Result<Option<Count>, ServiceError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| fail(e, format!("Failed to delete count with id {id}")))?;
        if let Some(row) = &deleted {
            info!(id = row.id, value = row.value, "count deleted");
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn increment_count(&self, id: i32) -> Result<Option<Count>, ServiceError> {
        self.repo
            .increment_or_decrement(id, 1)
            .await
            .map_err(|e| fail(e, format!("Failed to increment count with id {id}")))
    }

    #[instrument(skip(self))]
    pub async fn decrement_count(&self, id: i32) -> Result<Option<Count>, ServiceError> {
        self.repo
            .increment_or_decrement(id, -1)
            .await
            .map_err(|e| fail(e, format!("Failed to decrement count with id {id}")))
    }

    /// Clear the table and insert [`SEED_VALUES`].
    pub async fn seed_counts(&self) -> Result<Vec<Count>, ServiceError> {
        let created = self
            .repo
            .reset(&SEED_VALUES)
            .await
            .map_err(|e| fail(e, "Failed to seed counts".to_string()))?;
        info!(rows = created.len(), "count table seeded");
        Ok(created)
    }
}

fn fail(source: StorageError, message: String) -> ServiceError {
    error!(error = %source, "{message}");
    ServiceError::storage(message, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::memory::{FailingCountRepository, MemoryCountRepository};

    fn service() -> (CountService, Arc<MemoryCountRepository>) {
        let repo = Arc::new(MemoryCountRepository::new());
        (CountService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn create_then_get_by_id() {
        let (svc, _) = service();
        let created = svc.create_count(17).await.unwrap();
        let found = svc.get_count_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.value, 17);
        assert_eq!(found.updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn missing_id_is_none_not_error() {
        let (svc, repo) = service();
        assert!(svc.get_count_by_id(404).await.unwrap().is_none());
        assert!(svc.update_count(404, 1).await.unwrap().is_none());
        assert!(svc.delete_count(404).await.unwrap().is_none());
        assert!(svc.increment_count(404).await.unwrap().is_none());
        assert!(svc.decrement_count(404).await.unwrap().is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_replaces_value_and_refreshes_timestamp() {
        let (svc, _) = service();
        let created = svc.create_count(1).await.unwrap();
        let updated = svc.update_count(created.id, -40).await.unwrap().unwrap();
        assert_eq!(updated.value, -40);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn increment_then_decrement_restores_value() {
        let (svc, _) = service();
        let created = svc.create_count(5).await.unwrap();

        let up = svc.increment_count(created.id).await.unwrap().unwrap();
        assert_eq!(up.value, 6);
        let down = svc.decrement_count(created.id).await.unwrap().unwrap();
        assert_eq!(down.value, 5);

        assert!(up.updated_at > created.updated_at);
        assert!(down.updated_at > up.updated_at);
    }

    #[tokio::test]
    async fn decrement_goes_negative() {
        let (svc, _) = service();
        let created = svc.create_count(0).await.unwrap();
        let down = svc.decrement_count(created.id).await.unwrap().unwrap();
        assert_eq!(down.value, -1);
    }

    #[tokio::test]
    async fn delete_returns_last_known_state() {
        let (svc, _) = service();
        let created = svc.create_count(3).await.unwrap();
        let bumped = svc.increment_count(created.id).await.unwrap().unwrap();

        let deleted = svc.delete_count(created.id).await.unwrap().unwrap();
        assert_eq!(deleted, bumped);
        assert!(svc.get_count_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_most_recently_updated_first() {
        let (svc, _) = service();
        let a = svc.create_count(1).await.unwrap();
        let b = svc.create_count(2).await.unwrap();
        let c = svc.create_count(3).await.unwrap();

        let ids: Vec<i32> = svc.get_all_counts().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);

        svc.increment_count(a.id).await.unwrap();
        let ids: Vec<i32> = svc.get_all_counts().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, c.id, b.id]);
    }

    #[tokio::test]
    async fn seed_writes_five_fixed_rows() {
        let (svc, _) = service();
        svc.create_count(1234).await.unwrap();

        let seeded = svc.seed_counts().await.unwrap();
        let mut values: Vec<i32> = seeded.iter().map(|c| c.value).collect();
        values.sort();
        assert_eq!(values, vec![0, 10, 25, 50, 100]);
        assert_eq!(svc.get_all_counts().await.unwrap().len(), 5);

        svc.delete_count(seeded[0].id).await.unwrap().unwrap();
        assert_eq!(svc.get_all_counts().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn storage_failure_carries_readable_message() {
        let svc = CountService::new(Arc::new(FailingCountRepository));

        let err = svc.update_count(3, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to update count with id 3");
        assert!(std::error::Error::source(&err).is_some());

        let err = svc.get_all_counts().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to get counts");
    }
}
