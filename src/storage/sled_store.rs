//! Durable store on sled
//!
//! Trees:
//! - `comments`: comment id -> Comment JSON
//! - `results`: result job id -> StoredAnalysis JSON
//! - `sources`: source id -> latest result job id
//! - `job_links`: job id -> result job id
//! - `jobs`: job id -> JobProgress JSON
//!
//! `save_analysis` writes `results`, `sources` and `job_links` in one
//! multi-tree transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Transactional, Tree};
use std::path::Path;
use std::sync::Arc;

use super::{CommentStore, JobStatusStore, ResultStore, StoreError};
use crate::types::{Comment, JobProgress, StoredAnalysis};

#[derive(Clone)]
pub struct SledStore {
    db: Arc<sled::Db>,
    comments: Tree,
    results: Tree,
    sources: Tree,
    job_links: Tree,
    jobs: Tree,
}

impl SledStore {
    /// Open or create the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref)?;
        let store = Self {
            comments: db.open_tree("comments")?,
            results: db.open_tree("results")?,
            sources: db.open_tree("sources")?,
            job_links: db.open_tree("job_links")?,
            jobs: db.open_tree("jobs")?,
            db: Arc::new(db),
        };
        tracing::info!(path = ?path_ref, "Insights store opened");
        Ok(store)
    }

    /// Insert or replace comments
    pub fn put_comments(&self, comments: &[Comment]) -> Result<(), StoreError> {
        let mut batch = sled::Batch::default();
        for comment in comments {
            batch.insert(comment.id.as_bytes(), serde_json::to_vec(comment)?);
        }
        self.comments.apply_batch(batch)?;
        self.db.flush()?;
        tracing::debug!(count = comments.len(), "Stored comments");
        Ok(())
    }

    fn load_result(&self, result_job_id: &[u8]) -> Result<Option<StoredAnalysis>, StoreError> {
        match self.results.get(result_job_id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CommentStore for SledStore {
    async fn fetch_comments(&self, ids: &[String]) -> Result<Vec<Comment>, StoreError> {
        let mut comments = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(bytes) = self.comments.get(id.as_bytes())? {
                comments.push(serde_json::from_slice(&bytes)?);
            }
        }
        Ok(comments)
    }
}

#[async_trait]
impl ResultStore for SledStore {
    async fn find_recent(
        &self,
        source_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<StoredAnalysis>, StoreError> {
        let Some(result_job_id) = self.sources.get(source_id.as_bytes())? else {
            return Ok(None);
        };
        Ok(self.load_result(&result_job_id)?.filter(|r| r.created_at > since))
    }

    async fn save_analysis(&self, record: &StoredAnalysis) -> Result<(), StoreError> {
        let value = serde_json::to_vec(record)?;
        let job_key = record.job_id.as_bytes();
        let source_key = record.source_id.as_bytes();

        (&self.results, &self.sources, &self.job_links)
            .transaction(|(results, sources, links)| {
                results.insert(job_key, value.as_slice())?;
                sources.insert(source_key, job_key)?;
                links.insert(job_key, job_key)?;
                Ok::<(), ConflictableTransactionError<()>>(())
            })
            .map_err(|e: TransactionError<()>| StoreError::Transaction(format!("{e:?}")))?;

        self.db.flush()?;
        tracing::debug!(job_id = %record.job_id, source_id = %record.source_id, "Stored analysis");
        Ok(())
    }

    async fn link_result(&self, job_id: &str, record: &StoredAnalysis) -> Result<(), StoreError> {
        if !self.results.contains_key(record.job_id.as_bytes())? {
            return Err(StoreError::NotFound(format!("result for job {}", record.job_id)));
        }
        self.job_links.insert(job_id.as_bytes(), record.job_id.as_bytes())?;
        Ok(())
    }

    async fn result_for_job(&self, job_id: &str) -> Result<Option<StoredAnalysis>, StoreError> {
        match self.job_links.get(job_id.as_bytes())? {
            Some(result_job_id) => self.load_result(&result_job_id),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl JobStatusStore for SledStore {
    async fn update_progress(&self, progress: &JobProgress) -> Result<(), StoreError> {
        self.jobs.insert(progress.job_id.as_bytes(), serde_json::to_vec(progress)?)?;
        Ok(())
    }

    async fn job_progress(&self, job_id: &str) -> Result<Option<JobProgress>, StoreError> {
        match self.jobs.get(job_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisResult, JobStatus, SentimentBreakdown};
    use chrono::Duration;
    use tempfile::TempDir;

    fn record(job_id: &str, source_id: &str, created_at: DateTime<Utc>) -> StoredAnalysis {
        StoredAnalysis {
            job_id: job_id.to_string(),
            source_id: source_id.to_string(),
            created_at,
            result: AnalysisResult {
                summary: "Viewers loved it".into(),
                sentiment_breakdown: SentimentBreakdown {
                    positive: 1.0,
                    negative: 0.0,
                    neutral: 0.0,
                    confidence_score: 0.9,
                },
                emotions: Vec::new(),
                themes: Vec::new(),
                keywords: Vec::new(),
                quality_score: 0.8,
            },
        }
    }

    #[tokio::test]
    async fn test_comments_round_trip_through_db() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        store
            .put_comments(&[Comment::new("a", "first").with_likes(3), Comment::new("b", "second")])
            .unwrap();

        let ids = vec!["b".to_string(), "missing".to_string(), "a".to_string()];
        let comments = store.fetch_comments(&ids).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, "b");
        assert_eq!(comments[1].like_count, 3);
    }

    #[tokio::test]
    async fn test_saved_analysis_visible_everywhere() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let rec = record("job-1", "video-1", Utc::now());
        store.save_analysis(&rec).await.unwrap();

        let cutoff = Utc::now() - Duration::hours(24);
        assert_eq!(store.find_recent("video-1", cutoff).await.unwrap(), Some(rec.clone()));
        assert_eq!(store.result_for_job("job-1").await.unwrap(), Some(rec.clone()));

        store.link_result("job-2", &rec).await.unwrap();
        assert_eq!(store.result_for_job("job-2").await.unwrap().map(|r| r.job_id), Some("job-1".into()));
    }

    #[tokio::test]
    async fn test_stale_result_not_recent() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        store
            .save_analysis(&record("job-1", "video-1", Utc::now() - Duration::hours(30)))
            .await
            .unwrap();
        let cutoff = Utc::now() - Duration::hours(24);
        assert!(store.find_recent("video-1", cutoff).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        {
            let store = SledStore::open(dir.path()).unwrap();
            store.save_analysis(&record("job-1", "video-1", Utc::now())).await.unwrap();
        }
        let store = SledStore::open(dir.path()).unwrap();
        assert!(store.result_for_job("job-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_job_progress_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let mut progress = JobProgress::started("job-1");
        store.update_progress(&progress).await.unwrap();
        progress.complete("Analysis complete");
        store.update_progress(&progress).await.unwrap();

        let stored = store.job_progress("job-1").await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Completed);
        assert!(store.job_progress("job-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_link_unknown_result_fails() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let err = store.link_result("job-2", &record("nope", "video-1", Utc::now())).await;
        assert!(matches!(err, Err(StoreError::NotFound(_))));
    }
}
