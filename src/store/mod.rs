//! Durable storage for captured leads.
//!
//! Handlers only see the [`SubmissionStore`] trait, so the backing store can be
//! swapped without touching the HTTP layer. The production backend keeps every
//! record in one JSON array file; [`MemoryStore`] keeps them in process.

use async_trait::async_trait;
use thiserror::Error;

pub mod json_file;
pub mod memory;
pub mod models;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{LeadRecord, sort_newest_first};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored submissions are not valid JSON: {0}")]
    Corrupt(serde_json::Error),
    #[error("Failed to serialize submissions: {0}")]
    Serialization(serde_json::Error),
    #[error("Background write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Append-only persistence of lead records.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Appends one record after all existing ones.
    async fn append(&self, record: LeadRecord) -> Result<(), StoreError>;

    /// Returns every record in insertion order; empty when nothing was stored yet.
    async fn read_all(&self) -> Result<Vec<LeadRecord>, StoreError>;
}
