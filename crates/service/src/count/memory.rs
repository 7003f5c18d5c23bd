//! In-process repositories for tests. Not wired into any binary.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sea_orm::DbErr;
use tokio::sync::Mutex;

use models::errors::StorageError;
use models::Count;

use super::repository::CountRepository;

/// Map-backed repository with the same ordering and absence semantics as Postgres.
#[derive(Default)]
pub struct MemoryCountRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i32, Count>,
    last_id: i32,
    last_stamp: Option<DateTime<Utc>>,
}

impl Inner {
    // strictly increasing, so ordering by updated_at is total
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_stamp {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(next);
        next
    }

    fn insert(&mut self, value: i32) -> Count {
        self.last_id += 1;
        let row = Count { id: self.last_id, value, updated_at: self.stamp() };
        self.rows.insert(row.id, row.clone());
        row
    }
}

impl MemoryCountRepository {
    pub fn new() -> Self { Self::default() }

    pub async fn len(&self) -> usize { self.inner.lock().await.rows.len() }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

#[async_trait]
impl CountRepository for MemoryCountRepository {
    async fn find_all(&self) -> Result<Vec<Count>, StorageError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<Count> = inner.rows.values().cloned().collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Count>, StorageError> {
        Ok(self.inner.lock().await.rows.get(&id).cloned())
    }

    async fn create(&self, value: i32) -> Result<Count, StorageError> {
        Ok(self.inner.lock().await.insert(value))
    }

    async fn update(&self, id: i32, value: i32) -> Result<Option<Count>, StorageError> {
        let mut inner = self.inner.lock().await;
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        let stamp = inner.stamp();
        Ok(inner.rows.get_mut(&id).map(|row| {
            row.value = value;
            row.updated_at = stamp;
            row.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<Option<Count>, StorageError> {
        Ok(self.inner.lock().await.rows.remove(&id))
    }

    async fn increment_or_decrement(&self, id: i32, delta: i32) -> Result<Option<Count>, StorageError> {
        let mut inner = self.inner.lock().await;
        let Some(current) = inner.rows.get(&id).map(|r| r.value) else {
            return Ok(None);
        };
        let value = current
            .checked_add(delta)
            .ok_or_else(|| StorageError::Db(DbErr::Custom("integer out of range".into())))?;
        let stamp = inner.stamp();
        Ok(inner.rows.get_mut(&id).map(|row| {
            row.value = value;
            row.updated_at = stamp;
            row.clone()
        }))
    }

    async fn reset(&self, values: &[i32]) -> Result<Vec<Count>, StorageError> {
        let mut inner = self.inner.lock().await;
        inner.rows.clear();
        Ok(values.iter().map(|&v| inner.insert(v)).collect())
    }
}

/// Every call fails as if the database connection was lost.
#[derive(Default)]
pub struct FailingCountRepository;

fn connection_lost() -> StorageError {
    StorageError::Db(DbErr::Custom("connection refused".into()))
}

#[async_trait]
impl CountRepository for FailingCountRepository {
    async fn find_all(&self) -> Result<Vec<Count>, StorageError> { Err(connection_lost()) }
    async fn find_by_id(&self, _id: i32) -> Result<Option<Count>, StorageError> { Err(connection_lost()) }
    async fn create(&self, _value: i32) -> Result<Count, StorageError> { Err(connection_lost()) }
    async fn update(&self, _id: i32, _value: i32) -> Result<Option<Count>, StorageError> { Err(connection_lost()) }
    async fn delete(&self, _id: i32) -> Result<Option<Count>, StorageError> { Err(connection_lost()) }
    async fn increment_or_decrement(&self, _id: i32, _delta: i32) -> Result<Option<Count>, StorageError> {
        Err(connection_lost())
    }
    async fn reset(&self, _values: &[i32]) -> Result<Vec<Count>, StorageError> { Err(connection_lost()) }
}
