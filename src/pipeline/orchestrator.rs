//! Pipeline Orchestrator - cache check, fetch and the five analysis stages

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::PipelineError;
use crate::config::{AnalysisConfig, PipelineConfig, ThemeConfig};
use crate::llm::LlmBackend;
use crate::preprocess::{CommentPreprocessor, PreprocessingStats};
use crate::sentiment::{SentimentAnalyzer, SentimentStats};
use crate::storage::{CommentStore, JobStatusStore, ResultStore};
use crate::summary::{SummaryGenerator, SummaryInput};
use crate::themes::{ThemeAnalyzer, ThemeOverrides};
use crate::types::{AnalysisResult, Comment, JobProgress, PipelineStage, StoredAnalysis};

/// One analysis job
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub job_id: String,
    /// Post or video the comments belong to; the cache key
    pub source_id: String,
    pub comment_ids: Vec<String>,
    /// Clustering parameters for this run only
    pub theme_overrides: Option<ThemeOverrides>,
}

impl AnalysisRequest {
    pub fn new(job_id: impl Into<String>, source_id: impl Into<String>, comment_ids: Vec<String>) -> Self {
        Self {
            job_id: job_id.into(),
            source_id: source_id.into(),
            comment_ids,
            theme_overrides: None,
        }
    }

    pub fn with_theme_overrides(mut self, overrides: ThemeOverrides) -> Self {
        self.theme_overrides = Some(overrides);
        self
    }
}

/// Per-run counters from the stages that ran
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub preprocessing: PreprocessingStats,
    pub sentiment: SentimentStats,
    pub themes: usize,
    pub keywords: usize,
    pub summary_attempts: u32,
    pub summary_fallback: bool,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | sentiment: {} | {} themes, {} keywords | summary: {} attempts{}",
            self.preprocessing,
            self.sentiment,
            self.themes,
            self.keywords,
            self.summary_attempts,
            if self.summary_fallback { " (template)" } else { "" }
        )
    }
}

/// Finished job
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub job_id: String,
    pub record: StoredAnalysis,
    /// True when an earlier result was reused and no stage ran
    pub cache_hit: bool,
    /// `None` on a cache hit
    pub stats: Option<RunStats>,
}

pub struct PipelineOrchestrator {
    pipeline: PipelineConfig,
    theme_config: ThemeConfig,
    preprocessor: CommentPreprocessor,
    sentiment: SentimentAnalyzer,
    summary: SummaryGenerator,
    comments: Arc<dyn CommentStore>,
    results: Arc<dyn ResultStore>,
    jobs: Arc<dyn JobStatusStore>,
}

impl PipelineOrchestrator {
    pub fn new(
        config: &AnalysisConfig,
        backend: Arc<dyn LlmBackend>,
        comments: Arc<dyn CommentStore>,
        results: Arc<dyn ResultStore>,
        jobs: Arc<dyn JobStatusStore>,
    ) -> Self {
        info!(backend = backend.backend_name(), "Initializing analysis pipeline");
        Self {
            pipeline: config.pipeline.clone(),
            theme_config: config.themes.clone(),
            preprocessor: CommentPreprocessor::new(config.preprocessing.clone()),
            sentiment: SentimentAnalyzer::new(backend.clone(), config.sentiment.clone()),
            summary: SummaryGenerator::new(backend, config.summary.clone()),
            comments,
            results,
            jobs,
        }
    }

    /// Use one store for comments, results and job status
    pub fn with_store<S>(config: &AnalysisConfig, backend: Arc<dyn LlmBackend>, store: Arc<S>) -> Self
    where
        S: CommentStore + ResultStore + JobStatusStore + 'static,
    {
        Self::new(config, backend, store.clone(), store.clone(), store)
    }

    /// Run one job to COMPLETED or FAILED.
    ///
    /// On error the job is marked FAILED with the error message before the
    /// error is returned.
    pub async fn run(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<PipelineRun, PipelineError> {
        let mut progress = JobProgress::started(&request.job_id);
        self.report(&progress).await;

        match self.execute(request, cancel, &mut progress).await {
            Ok(run) => Ok(run),
            Err(e) => {
                error!(job_id = %request.job_id, source_id = %request.source_id, error = %e, "Analysis failed");
                progress.fail(&e.to_string());
                self.report(&progress).await;
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
        progress: &mut JobProgress,
    ) -> Result<PipelineRun, PipelineError> {
        let job_id = request.job_id.as_str();

        if let Some(cached) = self.cached_result(&request.source_id).await {
            self.results
                .link_result(job_id, &cached)
                .await
                .map_err(PipelineError::Persistence)?;
            progress.complete(&format!("Reused analysis from job {}", cached.job_id));
            self.report(progress).await;
            info!(job_id, source_id = %request.source_id, cached_job = %cached.job_id, "Cache hit, analysis reused");
            return Ok(PipelineRun {
                job_id: job_id.to_string(),
                record: cached,
                cache_hit: true,
                stats: None,
            });
        }

        let comments: Vec<Comment> = self
            .comments
            .fetch_comments(&request.comment_ids)
            .await
            .map_err(PipelineError::Fetch)?
            .into_iter()
            .filter(|c| !c.is_filtered)
            .collect();
        if comments.is_empty() {
            return Err(PipelineError::NoComments);
        }
        info!(job_id, source_id = %request.source_id, comments = comments.len(), "Starting analysis");

        // Stage 1
        Self::checkpoint(cancel, PipelineStage::Preprocessing)?;
        let preprocessed = self.preprocessor.process(&comments);
        self.advance(progress, PipelineStage::Preprocessing).await;

        // Stage 2
        Self::checkpoint(cancel, PipelineStage::Sentiment)?;
        let sentiment = self
            .sentiment
            .analyze_cancellable(&preprocessed.valid, cancel)
            .await
            .ok_or(PipelineError::Cancelled { stage: PipelineStage::Sentiment })?;
        self.advance(progress, PipelineStage::Sentiment).await;

        // Stage 3
        Self::checkpoint(cancel, PipelineStage::Themes)?;
        let mut theme_analyzer = ThemeAnalyzer::new(self.theme_config.clone());
        let themes = match request.theme_overrides {
            Some(overrides) => {
                theme_analyzer.analyze_with_overrides(&preprocessed.valid, &sentiment.results, overrides)
            }
            None => theme_analyzer.analyze(&preprocessed.valid, &sentiment.results),
        };
        self.advance(progress, PipelineStage::Themes).await;

        // Stage 4
        Self::checkpoint(cancel, PipelineStage::Summary)?;
        let summary = self
            .summary
            .generate(&SummaryInput {
                total_comments: comments.len(),
                valid_comments: preprocessed.valid.len(),
                filtered_comments: preprocessed.stats.filtered(),
                breakdown: sentiment.breakdown,
                themes: &themes.themes,
                keywords: &themes.keywords,
            })
            .await;
        self.advance(progress, PipelineStage::Summary).await;

        // Stage 5
        Self::checkpoint(cancel, PipelineStage::Persistence)?;
        let record = StoredAnalysis {
            job_id: job_id.to_string(),
            source_id: request.source_id.clone(),
            created_at: Utc::now(),
            result: AnalysisResult::assemble(&summary, sentiment.breakdown, &themes.themes, &themes.keywords),
        };
        self.results
            .save_analysis(&record)
            .await
            .map_err(PipelineError::Persistence)?;
        self.advance(progress, PipelineStage::Persistence).await;

        progress.complete("Analysis complete");
        self.report(progress).await;

        let stats = RunStats {
            preprocessing: preprocessed.stats,
            sentiment: sentiment.stats,
            themes: themes.themes.len(),
            keywords: themes.keywords.len(),
            summary_attempts: summary.attempts,
            summary_fallback: summary.used_fallback,
        };
        info!(job_id, quality_score = summary.quality_score, "Analysis complete: {}", stats);

        Ok(PipelineRun {
            job_id: job_id.to_string(),
            record,
            cache_hit: false,
            stats: Some(stats),
        })
    }

    /// Fresh cached result for the source, if any. Lookup failures only skip the cache.
    async fn cached_result(&self, source_id: &str) -> Option<StoredAnalysis> {
        let since = cache_cutoff(Utc::now(), self.pipeline.cache_ttl_hours);
        match self.results.find_recent(source_id, since).await {
            Ok(found) => found,
            Err(e) => {
                warn!(source_id, error = %e, "Cache lookup failed, running full analysis");
                None
            }
        }
    }

    fn checkpoint(cancel: &CancellationToken, stage: PipelineStage) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { stage });
        }
        Ok(())
    }

    async fn advance(&self, progress: &mut JobProgress, stage: PipelineStage) {
        progress.advance(stage, self.pipeline.stage_weights.cumulative_progress(stage));
        debug!(
            job_id = %progress.job_id,
            step = progress.current_step,
            progress = progress.progress,
            "{}",
            progress.step_description
        );
        self.report(progress).await;
    }

    /// Progress updates are best effort; a failing status store never fails the job
    async fn report(&self, progress: &JobProgress) {
        if let Err(e) = self.jobs.update_progress(progress).await {
            warn!(job_id = %progress.job_id, error = %e, "Failed to record job progress");
        }
    }
}

/// Oldest creation time still served from cache. A TTL too large to
/// represent means every stored result is fresh.
fn cache_cutoff(now: DateTime<Utc>, ttl_hours: i64) -> DateTime<Utc> {
    Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_sub_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
