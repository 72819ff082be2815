//! Mock record store for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::records::{Record, RecordStore, RecordStoreError};

/// In-memory record store with switchable failures.
#[derive(Debug, Default)]
pub struct MockRecordStore {
    records: Arc<RwLock<Vec<Record>>>,
    failing: AtomicBool,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record in store order.
    pub async fn add(&self, record: Record) {
        self.records.write().await.push(record);
    }

    /// Make every query fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RecordStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RecordStoreError::Database("mock store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn find_completed(&self, identifier: &str) -> Result<Option<Record>, RecordStoreError> {
        self.check()?;
        let identifier = identifier.to_lowercase();
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.completed && r.identifier.to_lowercase() == identifier)
            .cloned())
    }

    async fn list_completed(&self) -> Result<Vec<Record>, RecordStoreError> {
        self.check()?;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.completed)
            .cloned()
            .collect())
    }
}
