//! Scan history storage.
//!
//! Screens receive a [`RecordStore`] from the root composition instead of
//! reading a shared global list, so a persistence-backed store can replace
//! [`MemoryRecordStore`] without touching callers.

pub mod fixture;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ScanRecord;

pub use fixture::fixture_records;
pub use memory::MemoryRecordStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record {0} not found")]
    NotFound(String),

    #[error("record {0} already exists")]
    Duplicate(String),
}

impl RecordError {
    pub fn user_message(&self) -> String {
        match self {
            RecordError::NotFound(_) => "Snake not found".into(),
            RecordError::Duplicate(_) => "This scan is already saved.".into(),
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, most recently added first.
    async fn list(&self) -> Vec<ScanRecord>;

    async fn get(&self, id: &str) -> Result<ScanRecord, RecordError>;

    async fn append(&self, record: ScanRecord) -> Result<(), RecordError>;
}
