//! Sentiment Analyzer
//!
//! Classifies valid comments in fixed-size batches through the LLM backend.
//!
//! ## Per batch
//!
//! 1. One prompt numbering the comments from 1
//! 2. `call_with_retry`: timeout race per attempt, exponential backoff between
//!    attempts (stretched on rate limits). A response with no usable line is
//!    rejected and retried.
//! 3. Line-tolerant parse; any comment left without a result gets the
//!    rule-based fallback. Exhausted retries mean the whole batch falls back.
//! 4. Quality validation, logged only
//!
//! The output always holds exactly one result per input comment, in order.

mod fallback;
mod parsing;
mod prompt;
mod validation;

pub use fallback::fallback_sentiment;
pub use parsing::{parse_batch_response, ParsedBatch};
pub use prompt::build_batch_prompt;
pub use validation::{validate_results, SentimentValidation};

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::SentimentConfig;
use crate::llm::{call_with_retry, LlmBackend, RetryPolicy};
use crate::types::{PreprocessedComment, SentimentBreakdown, SentimentResult};

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentStats {
    pub batches: usize,
    /// Attempts beyond the first, summed over batches
    pub retry_count: u32,
    /// Results produced by the rule-based fallback
    pub fallback_count: usize,
    /// Batches where every attempt failed
    pub failed_batches: usize,
    /// Response lines that could not be used
    pub dropped_lines: usize,
    /// Low-confidence results replaced in advanced mode
    pub improved_count: usize,
}

impl std::fmt::Display for SentimentStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} batches ({} failed), {} retries, {} fallback results, {} dropped lines, {} improved",
            self.batches,
            self.failed_batches,
            self.retry_count,
            self.fallback_count,
            self.dropped_lines,
            self.improved_count
        )
    }
}

/// Output of one sentiment run
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalysis {
    /// Index-aligned with the input comments
    pub results: Vec<SentimentResult>,
    pub breakdown: SentimentBreakdown,
    pub quality_score: f64,
    pub stats: SentimentStats,
}

pub struct SentimentAnalyzer {
    backend: Arc<dyn LlmBackend>,
    config: SentimentConfig,
    policy: RetryPolicy,
}

impl SentimentAnalyzer {
    pub fn new(backend: Arc<dyn LlmBackend>, config: SentimentConfig) -> Self {
        let policy = RetryPolicy::for_sentiment(&config);
        Self { backend, config, policy }
    }

    /// Classify every comment. Never fails.
    pub async fn analyze(&self, comments: &[PreprocessedComment]) -> SentimentAnalysis {
        self.analyze_cancellable(comments, &CancellationToken::new())
            .await
            .unwrap_or_default()
    }

    /// Classify every comment, checking `cancel` before each batch.
    ///
    /// Returns `None` if cancelled; partial results are discarded.
    pub async fn analyze_cancellable(
        &self,
        comments: &[PreprocessedComment],
        cancel: &CancellationToken,
    ) -> Option<SentimentAnalysis> {
        let mut results = Vec::with_capacity(comments.len());
        let mut stats = SentimentStats::default();
        let batch_size = self.config.batch_size.max(1);

        for (batch_index, batch) in comments.chunks(batch_size).enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(batch = batch_index, "Sentiment analysis cancelled");
                return None;
            }
            if batch_index > 0 && self.config.inter_batch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.inter_batch_delay_ms)).await;
            }

            let batch_results = self.analyze_batch(batch_index, batch, &mut stats).await;

            let validation = validate_results(&batch_results);
            if validation.quality_score < self.config.quality_warning_threshold {
                tracing::warn!(
                    batch = batch_index,
                    quality_score = validation.quality_score,
                    issues = ?validation.issues,
                    "Sentiment batch below quality threshold"
                );
            }

            results.extend(batch_results);
            stats.batches += 1;
        }

        if self.config.advanced_mode && !cancel.is_cancelled() {
            self.refine_low_confidence(comments, &mut results, &mut stats).await;
        }

        let quality_score = validate_results(&results).quality_score;
        let breakdown = SentimentBreakdown::from_results(&results);

        tracing::info!(
            comments = comments.len(),
            quality_score,
            stats = %stats,
            "Sentiment analysis complete"
        );

        Some(SentimentAnalysis { results, breakdown, quality_score, stats })
    }

    async fn analyze_batch(
        &self,
        batch_index: usize,
        batch: &[PreprocessedComment],
        stats: &mut SentimentStats,
    ) -> Vec<SentimentResult> {
        let texts: Vec<&str> = batch.iter().map(|c| c.cleaned_text.as_str()).collect();
        let prompt = build_batch_prompt(&texts);

        let outcome = call_with_retry(self.backend.as_ref(), &prompt, &self.policy, |response| {
            let parsed = parse_batch_response(&response, texts.len());
            if parsed.parsed_count() == 0 {
                Err(format!("no usable lines ({} dropped)", parsed.dropped_lines))
            } else {
                Ok(parsed)
            }
        })
        .await;

        stats.retry_count += outcome.retries();

        let Some(parsed) = outcome.value else {
            tracing::warn!(
                batch = batch_index,
                attempts = outcome.attempts,
                reason = outcome.last_failure.as_deref().unwrap_or("unknown"),
                "Sentiment batch failed, using rule-based fallback"
            );
            stats.failed_batches += 1;
            stats.fallback_count += texts.len();
            return texts.iter().map(|t| fallback_sentiment(t)).collect();
        };

        stats.dropped_lines += parsed.dropped_lines;
        if parsed.missing_count() > 0 {
            tracing::debug!(
                batch = batch_index,
                missing = parsed.missing_count(),
                "Filling missing sentiment results with fallback"
            );
        }

        parsed
            .results
            .into_iter()
            .zip(&texts)
            .map(|(slot, text)| {
                slot.unwrap_or_else(|| {
                    stats.fallback_count += 1;
                    fallback_sentiment(text)
                })
            })
            .collect()
    }

    /// Re-submit results under the confidence threshold one comment at a time.
    /// A replacement is kept only when its confidence is higher.
    async fn refine_low_confidence(
        &self,
        comments: &[PreprocessedComment],
        results: &mut [SentimentResult],
        stats: &mut SentimentStats,
    ) {
        let single = self.policy.single_shot();

        for (comment, current) in comments.iter().zip(results.iter_mut()) {
            if current.confidence >= self.config.low_confidence_threshold {
                continue;
            }

            let prompt = build_batch_prompt(&[comment.cleaned_text.as_str()]);
            let outcome = call_with_retry(self.backend.as_ref(), &prompt, &single, |response| {
                parse_batch_response(&response, 1)
                    .results
                    .into_iter()
                    .next()
                    .flatten()
                    .ok_or_else(|| "no usable line".to_string())
            })
            .await;

            if let Some(candidate) = outcome.value {
                if candidate.confidence > current.confidence {
                    tracing::debug!(
                        comment_id = %comment.id(),
                        before = current.confidence,
                        after = candidate.confidence,
                        "Improved low-confidence sentiment"
                    );
                    if current.is_fallback {
                        stats.fallback_count = stats.fallback_count.saturating_sub(1);
                    }
                    *current = candidate;
                    stats.improved_count += 1;
                }
            }
        }
    }
}
