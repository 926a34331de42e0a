//! Persisted aggregate: AnalysisResult and its record wrapper

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    GeneratedSummary, KeywordData, Sentiment, SentimentBreakdown, ThemeCluster,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionShare {
    pub name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeReport {
    pub name: String,
    pub frequency: usize,
    pub sentiment: Sentiment,
    pub example_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub word: String,
    pub frequency: usize,
    pub sentiment: Sentiment,
    pub contexts: Vec<String>,
}

/// Full analysis aggregate written atomically to the result store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub sentiment_breakdown: SentimentBreakdown,
    pub emotions: Vec<EmotionShare>,
    pub themes: Vec<ThemeReport>,
    pub keywords: Vec<KeywordReport>,
    pub quality_score: f64,
}

impl AnalysisResult {
    /// Assemble the aggregate from the stage outputs
    pub fn assemble(
        summary: &GeneratedSummary,
        breakdown: SentimentBreakdown,
        themes: &[ThemeCluster],
        keywords: &[KeywordData],
    ) -> Self {
        Self {
            summary: summary.summary.clone(),
            sentiment_breakdown: breakdown,
            emotions: summary
                .emotions
                .iter()
                .map(|e| EmotionShare { name: e.name.clone(), percentage: e.prevalence })
                .collect(),
            themes: themes
                .iter()
                .map(|t| ThemeReport {
                    name: t.name.clone(),
                    frequency: t.frequency,
                    sentiment: t.sentiment,
                    example_comments: t.representative_comments.clone(),
                })
                .collect(),
            keywords: keywords
                .iter()
                .map(|k| KeywordReport {
                    word: k.word.clone(),
                    frequency: k.frequency,
                    sentiment: k.sentiment,
                    contexts: k.contexts.clone(),
                })
                .collect(),
            quality_score: summary.quality_score,
        }
    }
}

/// Stored result with the job and source it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub job_id: String,
    pub source_id: String,
    pub created_at: DateTime<Utc>,
    pub result: AnalysisResult,
}
