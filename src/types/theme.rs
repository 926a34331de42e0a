//! Theme types: KeywordData, ThemeCluster, ThemeSummary, ThemeAnalysis

use serde::{Deserialize, Serialize};

use super::Sentiment;

/// A distinctive corpus term scored by TF-IDF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordData {
    pub word: String,
    /// Total occurrences across the corpus (always >= 2)
    pub frequency: usize,
    /// Majority sentiment of the comments containing the term
    pub sentiment: Sentiment,
    /// Up to 5 context windows of +/-2 words around occurrences
    pub contexts: Vec<String>,
    pub tfidf_score: f64,
    /// Share of votes held by the majority sentiment (0-1)
    pub sentiment_score: f64,
}

/// Group of similar comments forming a discussion theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeCluster {
    pub id: String,
    pub name: String,
    /// Ids of member comments
    pub comments: Vec<String>,
    pub sentiment: Sentiment,
    /// Always `comments.len()`
    pub frequency: usize,
    /// Up to 3 member texts ranked by length and likes
    pub representative_comments: Vec<String>,
    /// Up to 5 global keywords present in this cluster
    pub keywords: Vec<String>,
    /// Mean pairwise similarity within the cluster (0-1)
    pub coherence_score: f64,
}

/// Corpus-level theme statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSummary {
    pub total_themes: usize,
    pub total_keywords: usize,
    pub average_coherence: f64,
    /// Dominant sentiment weighted by cluster frequency
    pub dominant_sentiment: Sentiment,
}

impl Default for ThemeSummary {
    fn default() -> Self {
        Self {
            total_themes: 0,
            total_keywords: 0,
            average_coherence: 0.0,
            dominant_sentiment: Sentiment::Neutral,
        }
    }
}

/// Output of one theme analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAnalysis {
    pub themes: Vec<ThemeCluster>,
    pub keywords: Vec<KeywordData>,
    pub summary: ThemeSummary,
}
