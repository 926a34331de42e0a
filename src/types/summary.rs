//! Summary types: EmotionInsight, GeneratedSummary, SummaryValidation

use serde::{Deserialize, Serialize};

/// Emotion inferred from theme sentiment and vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionInsight {
    pub name: String,
    /// Share of valid comments (0-100, one decimal)
    pub prevalence: f64,
    pub description: String,
    pub representative_comments: Vec<String>,
}

/// Narrative report produced by the summary generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSummary {
    pub summary: String,
    /// Top 3 emotions by prevalence
    pub emotions: Vec<EmotionInsight>,
    /// At most 4
    pub key_insights: Vec<String>,
    /// At most 3
    pub recommendations: Vec<String>,
    pub quality_score: f64,
    pub word_count: usize,
    /// True when the narrative came from the deterministic template
    #[serde(default)]
    pub used_fallback: bool,
    /// Model calls made, 0 when no call was needed
    #[serde(default)]
    pub attempts: u32,
}

/// Outcome of the summary self-check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryValidation {
    pub is_valid: bool,
    pub issues: Vec<String>,
    /// 1.0 minus weighted penalties, floored at 0
    pub quality_score: f64,
    /// Suggested fixes, one per issue
    pub recommendations: Vec<String>,
}
