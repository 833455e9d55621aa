use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use tokio::sync::RwLock;

use super::{RecordError, RecordStore};
use crate::models::ScanRecord;

/// Process-lifetime record store. Records are only ever added, never edited
/// or removed.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<Vec<ScanRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. Later duplicates of an id are dropped so lookups stay
    /// unambiguous.
    pub fn with_records(records: Vec<ScanRecord>) -> Self {
        let mut unique: Vec<ScanRecord> = Vec::with_capacity(records.len());
        for record in records {
            if unique.iter().any(|existing| existing.id == record.id) {
                log::warn!("Dropping duplicate seed record {}", record.id);
                continue;
            }
            unique.push(record);
        }

        Self {
            records: Arc::new(RwLock::new(unique)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self) -> Vec<ScanRecord> {
        self.records.read().await.clone()
    }

    async fn get(&self, id: &str) -> Result<ScanRecord, RecordError> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    async fn append(&self, record: ScanRecord) -> Result<(), RecordError> {
        let mut guard = self.records.write().await;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RecordError::Duplicate(record.id));
        }

        info!("Saved scan record {} ({})", record.id, record.name);
        guard.insert(0, record);
        Ok(())
    }
}
