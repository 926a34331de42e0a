//! Theme Analyzer
//!
//! Two passes over the valid comments:
//! - **Keywords**: TF-IDF over meaningful tokens, with per-term sentiment votes
//!   and context windows
//! - **Clusters**: greedy Jaccard clustering over token sets, then naming,
//!   representative comments, keywords and coherence per cluster
//!
//! Synchronous and infallible. Empty or degenerate corpora give empty results.

mod clustering;
mod describe;
mod keywords;
mod tokenize;

pub use clustering::{cluster_documents, coherence, similarity_matrix};
pub use keywords::extract_keywords;
pub use tokenize::{tokenize, Document};

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use crate::config::ThemeConfig;
use crate::types::{
    PreprocessedComment, Sentiment, SentimentResult, SentimentTally, ThemeAnalysis, ThemeCluster,
    ThemeSummary,
};

/// Per-invocation replacements for clustering parameters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThemeOverrides {
    pub min_cluster_size: Option<usize>,
    pub max_clusters: Option<usize>,
    pub similarity_threshold: Option<f64>,
    pub max_keywords: Option<usize>,
}

impl ThemeOverrides {
    fn apply(&self, config: &mut ThemeConfig) {
        if let Some(v) = self.min_cluster_size {
            config.min_cluster_size = v;
        }
        if let Some(v) = self.max_clusters {
            config.max_clusters = v;
        }
        if let Some(v) = self.similarity_threshold {
            config.similarity_threshold = v;
        }
        if let Some(v) = self.max_keywords {
            config.max_keywords = v;
        }
    }
}

pub struct ThemeAnalyzer {
    config: ThemeConfig,
}

impl ThemeAnalyzer {
    pub fn new(config: ThemeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Apply `overrides` until the returned guard is dropped.
    ///
    /// The previous configuration is restored on every exit path, including
    /// unwinding.
    pub fn scoped(&mut self, overrides: ThemeOverrides) -> ScopedThemeConfig<'_> {
        let saved = self.config.clone();
        overrides.apply(&mut self.config);
        tracing::debug!(?overrides, "Theme configuration overridden");
        ScopedThemeConfig { analyzer: self, saved: Some(saved) }
    }

    /// Run one analysis with `overrides` applied
    pub fn analyze_with_overrides(
        &mut self,
        comments: &[PreprocessedComment],
        sentiments: &[SentimentResult],
        overrides: ThemeOverrides,
    ) -> ThemeAnalysis {
        self.scoped(overrides).analyze(comments, sentiments)
    }

    /// Extract keywords and themes. `sentiments` is index-aligned with
    /// `comments`; missing entries count as NEUTRAL.
    pub fn analyze(
        &self,
        comments: &[PreprocessedComment],
        sentiments: &[SentimentResult],
    ) -> ThemeAnalysis {
        if comments.is_empty() {
            return ThemeAnalysis::default();
        }

        let docs: Vec<Document> = comments.iter().map(|c| tokenize(&c.cleaned_text)).collect();
        let labels: Vec<Sentiment> = sentiments.iter().map(|s| s.sentiment).collect();

        let keywords = extract_keywords(&docs, &labels, self.config.max_keywords);
        let global: HashSet<&str> = keywords.iter().map(|k| k.word.as_str()).collect();

        let matrix = similarity_matrix(&docs);
        let groups = cluster_documents(&docs, &labels, &matrix, &self.config);

        let themes: Vec<ThemeCluster> = groups
            .iter()
            .enumerate()
            .map(|(n, members)| {
                let mut tally = SentimentTally::default();
                for &i in members {
                    tally.add(labels.get(i).copied().unwrap_or_default());
                }

                ThemeCluster {
                    id: format!("theme-{}", n + 1),
                    name: describe::theme_name(members, &docs, &global),
                    comments: members.iter().map(|&i| comments[i].id().to_string()).collect(),
                    sentiment: tally.majority(),
                    frequency: members.len(),
                    representative_comments: describe::representative_comments(members, comments),
                    keywords: describe::theme_keywords(members, &docs, &keywords),
                    coherence_score: coherence(members, &matrix),
                }
            })
            .collect();

        let summary = summarize(&themes, keywords.len());

        tracing::info!(
            comments = comments.len(),
            themes = summary.total_themes,
            keywords = summary.total_keywords,
            dominant = %summary.dominant_sentiment,
            "Theme analysis complete"
        );

        ThemeAnalysis { themes, keywords, summary }
    }
}

impl Default for ThemeAnalyzer {
    fn default() -> Self {
        Self::new(ThemeConfig::default())
    }
}

fn summarize(themes: &[ThemeCluster], total_keywords: usize) -> ThemeSummary {
    let mut tally = SentimentTally::default();
    for t in themes {
        tally.add_weighted(t.sentiment, t.frequency);
    }

    let average_coherence = if themes.is_empty() {
        0.0
    } else {
        themes.iter().map(|t| t.coherence_score).sum::<f64>() / themes.len() as f64
    };

    ThemeSummary {
        total_themes: themes.len(),
        total_keywords,
        average_coherence,
        dominant_sentiment: tally.majority(),
    }
}

// ============================================================================
// Scoped Configuration
// ============================================================================

/// Analyzer with overridden configuration; restores the saved one on drop
pub struct ScopedThemeConfig<'a> {
    analyzer: &'a mut ThemeAnalyzer,
    saved: Option<ThemeConfig>,
}

impl Deref for ScopedThemeConfig<'_> {
    type Target = ThemeAnalyzer;

    fn deref(&self) -> &ThemeAnalyzer {
        self.analyzer
    }
}

impl DerefMut for ScopedThemeConfig<'_> {
    fn deref_mut(&mut self) -> &mut ThemeAnalyzer {
        self.analyzer
    }
}

impl Drop for ScopedThemeConfig<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.analyzer.config = saved;
            tracing::debug!("Theme configuration restored");
        }
    }
}
