//! Summary Generator
//!
//! Turns the sentiment and theme outputs into a narrative report:
//! - Emotions, key insights and recommendations are rule-based
//! - The narrative comes from the LLM, cleaned and self-validated; rejected
//!   drafts are retried with linear backoff
//! - Exhausted retries fall back to a template built from the numbers alone

mod emotions;
mod insights;
mod prompt;
mod template;
mod validation;

pub use emotions::{infer_emotions, theme_emotion};
pub use insights::{key_insights, recommendations};
pub use prompt::{build_summary_prompt, clean_response, word_count};
pub use template::{template_summary, EMPTY_SUMMARY_TEXT};
pub use validation::{validate_summary, SummaryDraft};

use std::sync::Arc;

use crate::config::defaults::{EMPTY_SUMMARY_QUALITY, TEMPLATE_SUMMARY_QUALITY};
use crate::config::SummaryConfig;
use crate::llm::{call_with_retry, LlmBackend, RetryPolicy};
use crate::types::{
    GeneratedSummary, KeywordData, SentimentBreakdown, SummaryValidation, ThemeCluster,
};

/// Aggregates the narrative is built from
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    /// Comments fetched, before filtering
    pub total_comments: usize,
    pub valid_comments: usize,
    pub filtered_comments: usize,
    pub breakdown: SentimentBreakdown,
    /// Sorted largest first
    pub themes: &'a [ThemeCluster],
    /// Sorted by TF-IDF
    pub keywords: &'a [KeywordData],
}

pub struct SummaryGenerator {
    backend: Arc<dyn LlmBackend>,
    config: SummaryConfig,
    policy: RetryPolicy,
}

impl SummaryGenerator {
    pub fn new(backend: Arc<dyn LlmBackend>, config: SummaryConfig) -> Self {
        let policy = RetryPolicy::for_summary(&config);
        Self { backend, config, policy }
    }

    /// Build the report. Never fails; degradation shows in `used_fallback`
    /// and `quality_score`.
    pub async fn generate(&self, input: &SummaryInput<'_>) -> GeneratedSummary {
        if input.valid_comments == 0 {
            tracing::info!("No valid comments, returning empty summary");
            return GeneratedSummary {
                summary: EMPTY_SUMMARY_TEXT.to_string(),
                emotions: Vec::new(),
                key_insights: Vec::new(),
                recommendations: Vec::new(),
                quality_score: EMPTY_SUMMARY_QUALITY,
                word_count: word_count(EMPTY_SUMMARY_TEXT),
                used_fallback: false,
                attempts: 0,
            };
        }

        let emotions = infer_emotions(input.themes, input.valid_comments);
        let key_insights = key_insights(input, &self.config);
        let recommendations = recommendations(input, &self.config);

        let prompt = build_summary_prompt(input);
        let outcome = call_with_retry(self.backend.as_ref(), &prompt, &self.policy, |raw| {
            let text = clean_response(&raw);
            if text.is_empty() {
                return Err("empty summary".to_string());
            }
            if text.chars().count() < self.config.min_characters {
                return Err(format!("summary too short ({} characters)", text.chars().count()));
            }
            let validation = validate_summary(
                &SummaryDraft {
                    text: &text,
                    emotions: &emotions,
                    key_insights: &key_insights,
                    recommendations: &recommendations,
                    total_comments: input.total_comments,
                },
                &self.config,
            );
            if validation.is_valid {
                Ok((text, validation))
            } else {
                Err(format!(
                    "quality {:.2} below {:.2}: {}",
                    validation.quality_score,
                    self.config.min_quality_score,
                    validation.issues.join("; ")
                ))
            }
        })
        .await;

        let attempts = outcome.attempts;
        let (summary, quality_score, used_fallback) = match outcome.value {
            Some((text, SummaryValidation { quality_score, issues, .. })) => {
                if !issues.is_empty() {
                    tracing::debug!(?issues, "Summary accepted with minor issues");
                }
                (text, quality_score, false)
            }
            None => {
                tracing::warn!(
                    attempts,
                    reason = outcome.last_failure.as_deref().unwrap_or("unknown"),
                    "Summary generation failed, using template"
                );
                (template_summary(input), TEMPLATE_SUMMARY_QUALITY, true)
            }
        };

        tracing::info!(
            attempts,
            quality_score,
            used_fallback,
            emotions = emotions.len(),
            "Summary generated"
        );

        GeneratedSummary {
            word_count: word_count(&summary),
            summary,
            emotions,
            key_insights,
            recommendations,
            quality_score,
            used_fallback,
            attempts,
        }
    }
}
