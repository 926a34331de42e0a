//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use comment_insights::storage::{ResultStore, StoreError};
use comment_insights::{AnalysisConfig, Comment, LlmBackend, LlmError, StoredAnalysis};

/// Answers sentiment prompts by keyword and summary prompts with a fixed
/// narrative, counting every call.
#[derive(Default)]
pub struct KeywordBackend {
    sentiment_calls: AtomicUsize,
    summary_calls: AtomicUsize,
}

impl KeywordBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sentiment_calls(&self) -> usize {
        self.sentiment_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.sentiment_calls() + self.summary_calls()
    }
}

fn classify(text: &str) -> (&'static str, &'static str) {
    let lower = text.to_lowercase();
    if ["love", "amazing", "great", "awesome"].iter().any(|w| lower.contains(w)) {
        ("POSITIVE", "joy")
    } else if ["terrible", "bad", "awful", "broken"].iter().any(|w| lower.contains(w)) {
        ("NEGATIVE", "frustration")
    } else {
        ("NEUTRAL", "curiosity")
    }
}

pub const SUMMARY_TEXT: &str = "Viewers responded warmly overall, with roughly 60% of comments expressing \
positive sentiment about the video. Many praised the editing style and the pacing of the story, \
calling it some of the best work on the channel so far. A smaller group raised concerns about the \
audio quality in the second half, describing the sound as muddy and uneven in places. Neutral \
comments mostly asked questions about the gear and software used. Overall the audience is engaged \
and clearly wants more content in this style.";

#[async_trait]
impl LlmBackend for KeywordBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.contains("commentIndex") {
            self.sentiment_calls.fetch_add(1, Ordering::SeqCst);
            let section = prompt
                .split("### COMMENTS\n")
                .nth(1)
                .and_then(|rest| rest.split("\n\n### INSTRUCTIONS").next())
                .unwrap_or("");
            let lines: Vec<String> = section
                .lines()
                .filter_map(|line| line.split_once(". "))
                .map(|(index, text)| {
                    let (sentiment, emotion) = classify(text);
                    format!(
                        r#"{{"commentIndex": {index}, "sentiment": "{sentiment}", "confidence": 0.9, "emotions": [{{"name": "{emotion}", "score": 0.7}}]}}"#
                    )
                })
                .collect();
            Ok(lines.join("\n"))
        } else {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SUMMARY_TEXT.to_string())
        }
    }

    fn backend_name(&self) -> &'static str {
        "keyword"
    }
}

/// Result store whose writes always fail
pub struct FailingResultStore;

#[async_trait]
impl ResultStore for FailingResultStore {
    async fn find_recent(
        &self,
        _source_id: &str,
        _since: DateTime<Utc>,
    ) -> Result<Option<StoredAnalysis>, StoreError> {
        Ok(None)
    }

    async fn save_analysis(&self, _record: &StoredAnalysis) -> Result<(), StoreError> {
        Err(StoreError::Transaction("disk full".to_string()))
    }

    async fn link_result(&self, job_id: &str, _record: &StoredAnalysis) -> Result<(), StoreError> {
        Err(StoreError::NotFound(job_id.to_string()))
    }

    async fn result_for_job(&self, _job_id: &str) -> Result<Option<StoredAnalysis>, StoreError> {
        Ok(None)
    }
}

/// Zero delays everywhere
pub fn fast_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.sentiment.base_delay_ms = 0;
    config.sentiment.max_jitter_ms = 0;
    config.sentiment.inter_batch_delay_ms = 0;
    config.summary.retry_delay_ms = 0;
    config
}

/// Realistic comment thread on one video, including spam, abuse and a repost
pub fn video_comments() -> Vec<Comment> {
    let texts = [
        "Love the editing style in this one, the transitions are amazing",
        "The editing style and pacing are great, best video on the channel",
        "Audio is terrible in the second half, the sound is muddy",
        "Sound quality in the second half is bad, audio too quiet",
        "What camera and lens did you use for the outdoor shots?",
        "Which camera did you use for the outdoor scenes?",
        "Amazing storytelling, I love how the story builds up",
        "SUBSCRIBE TO MY CHANNEL FOR FREE MONEY",
        "you are an idiot and this is stupid",
        "Love the editing style in this one, the transitions are amazing!",
        "nice nice nice nice nice nice",
        "Great pacing and storytelling throughout the whole video",
    ];
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Comment::new(format!("c{:02}", i + 1), *t)
                .with_author(format!("viewer{}", i % 5))
                .with_likes(i as u64)
        })
        .collect()
}
