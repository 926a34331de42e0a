//! Storage ports for the analysis pipeline
//!
//! The pipeline talks to four external collaborators through async traits so
//! backends can be swapped without touching pipeline code:
//! - `CommentStore`: fetch comments by id
//! - `ResultStore`: cached results per source, atomic aggregate writes
//! - `JobStatusStore`: job progress records
//! - `PrerequisiteChecker`: source ownership and linked-account lookups
//!
//! Implementations:
//! - `InMemoryStore`: all four, for tests and one-shot CLI runs
//! - `SledStore`: durable comments, results and job status

mod memory;
mod sled_store;

pub use memory::InMemoryStore;
pub use sled_store::SledStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{Comment, JobProgress, StoredAnalysis};

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("transaction aborted: {0}")]
    Transaction(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Comments with the given ids, in request order. Unknown ids are skipped.
    async fn fetch_comments(&self, ids: &[String]) -> Result<Vec<Comment>, StoreError>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Latest result for `source_id` created after `since`
    async fn find_recent(
        &self,
        source_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<StoredAnalysis>, StoreError>;

    /// Write the aggregate and its source index together, or nothing
    async fn save_analysis(&self, record: &StoredAnalysis) -> Result<(), StoreError>;

    /// Point `job_id` at an existing result (cache hit)
    async fn link_result(&self, job_id: &str, record: &StoredAnalysis) -> Result<(), StoreError>;

    /// Result produced for or linked to `job_id`
    async fn result_for_job(&self, job_id: &str) -> Result<Option<StoredAnalysis>, StoreError>;
}

#[async_trait]
pub trait JobStatusStore: Send + Sync {
    async fn update_progress(&self, progress: &JobProgress) -> Result<(), StoreError>;

    async fn job_progress(&self, job_id: &str) -> Result<Option<JobProgress>, StoreError>;
}

#[async_trait]
pub trait PrerequisiteChecker: Send + Sync {
    /// Owner of the source item, `None` if it does not exist
    async fn source_owner(&self, source_id: &str) -> Result<Option<String>, StoreError>;

    /// Unfiltered comments stored for the source item
    async fn count_valid_comments(&self, source_id: &str) -> Result<usize, StoreError>;

    async fn has_linked_account(&self, user_id: &str) -> Result<bool, StoreError>;
}
