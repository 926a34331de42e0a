//! In-memory store for tests and one-shot runs
//!
//! Thread-safe via `RwLock`. Not durable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{CommentStore, JobStatusStore, PrerequisiteChecker, ResultStore, StoreError};
use crate::types::{Comment, JobProgress, StoredAnalysis};

/// Progress updates kept for `progress_history`; older ones are dropped
const PROGRESS_LOG_CAPACITY: usize = 10_000;

#[derive(Default)]
struct State {
    comments: HashMap<String, Comment>,
    /// source id -> comment ids
    source_comments: HashMap<String, Vec<String>>,
    /// source id -> owner user id
    source_owners: HashMap<String, String>,
    linked_accounts: HashSet<String>,
    /// result job id -> record
    results: HashMap<String, StoredAnalysis>,
    /// source id -> latest result job id
    latest_by_source: HashMap<String, String>,
    /// job id -> result job id
    job_links: HashMap<String, String>,
    jobs: HashMap<String, JobProgress>,
    /// Most recent progress updates in arrival order
    progress_log: VecDeque<JobProgress>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state.read().map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state.write().map_err(|e| StoreError::Storage(e.to_string()))
    }

    /// Register a source item owned by `owner` with its comments
    pub fn insert_source(
        &self,
        source_id: &str,
        owner: &str,
        comments: Vec<Comment>,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.source_owners.insert(source_id.to_string(), owner.to_string());
        let ids = state.source_comments.entry(source_id.to_string()).or_default();
        for comment in &comments {
            ids.push(comment.id.clone());
        }
        for comment in comments {
            state.comments.insert(comment.id.clone(), comment);
        }
        Ok(())
    }

    pub fn link_account(&self, user_id: &str) -> Result<(), StoreError> {
        self.write()?.linked_accounts.insert(user_id.to_string());
        Ok(())
    }

    /// Ids of every comment registered for the source, in insertion order
    pub fn comment_ids(&self, source_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.read()?.source_comments.get(source_id).cloned().unwrap_or_default())
    }

    /// Progress updates received for `job_id`, oldest first. Only the last
    /// `PROGRESS_LOG_CAPACITY` updates across all jobs are retained.
    pub fn progress_history(&self, job_id: &str) -> Result<Vec<JobProgress>, StoreError> {
        Ok(self
            .read()?
            .progress_log
            .iter()
            .filter(|p| p.job_id == job_id)
            .cloned()
            .collect())
    }

    pub fn result_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.results.len())
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn fetch_comments(&self, ids: &[String]) -> Result<Vec<Comment>, StoreError> {
        let state = self.read()?;
        Ok(ids.iter().filter_map(|id| state.comments.get(id).cloned()).collect())
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    async fn find_recent(
        &self,
        source_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<StoredAnalysis>, StoreError> {
        let state = self.read()?;
        Ok(state
            .latest_by_source
            .get(source_id)
            .and_then(|job_id| state.results.get(job_id))
            .filter(|r| r.created_at > since)
            .cloned())
    }

    async fn save_analysis(&self, record: &StoredAnalysis) -> Result<(), StoreError> {
        // single write guard: readers see all three entries or none
        let mut state = self.write()?;
        state.results.insert(record.job_id.clone(), record.clone());
        state.latest_by_source.insert(record.source_id.clone(), record.job_id.clone());
        state.job_links.insert(record.job_id.clone(), record.job_id.clone());
        Ok(())
    }

    async fn link_result(&self, job_id: &str, record: &StoredAnalysis) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if !state.results.contains_key(&record.job_id) {
            return Err(StoreError::NotFound(format!("result for job {}", record.job_id)));
        }
        state.job_links.insert(job_id.to_string(), record.job_id.clone());
        Ok(())
    }

    async fn result_for_job(&self, job_id: &str) -> Result<Option<StoredAnalysis>, StoreError> {
        let state = self.read()?;
        Ok(state
            .job_links
            .get(job_id)
            .and_then(|result_job| state.results.get(result_job))
            .cloned())
    }
}

#[async_trait]
impl JobStatusStore for InMemoryStore {
    async fn update_progress(&self, progress: &JobProgress) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.jobs.insert(progress.job_id.clone(), progress.clone());
        if state.progress_log.len() == PROGRESS_LOG_CAPACITY {
            state.progress_log.pop_front();
        }
        state.progress_log.push_back(progress.clone());
        Ok(())
    }

    async fn job_progress(&self, job_id: &str) -> Result<Option<JobProgress>, StoreError> {
        Ok(self.read()?.jobs.get(job_id).cloned())
    }
}

#[async_trait]
impl PrerequisiteChecker for InMemoryStore {
    async fn source_owner(&self, source_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.source_owners.get(source_id).cloned())
    }

    async fn count_valid_comments(&self, source_id: &str) -> Result<usize, StoreError> {
        let state = self.read()?;
        Ok(state
            .source_comments
            .get(source_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.comments.get(id))
                    .filter(|c| !c.is_filtered)
                    .count()
            })
            .unwrap_or(0))
    }

    async fn has_linked_account(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.linked_accounts.contains(user_id))
    }
}
