use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{LeadRecord, StoreError, SubmissionStore};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<LeadRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn append(&self, record: LeadRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<LeadRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }
}
