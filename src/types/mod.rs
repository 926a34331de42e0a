//! Shared data structures for the comment analysis pipeline
//!
//! This module defines the core types passed between stages:
//! - Stage 1: Comment, PreprocessedComment (preprocessor input/output)
//! - Stage 2: SentimentResult, SentimentBreakdown (sentiment analyzer)
//! - Stage 3: KeywordData, ThemeCluster, ThemeAnalysis (theme analyzer)
//! - Stage 4: GeneratedSummary, EmotionInsight (summary generator)
//! - Stage 5: AnalysisResult (persisted aggregate)
//! - JobProgress / JobStatus (progress stream)

mod comment;
mod sentiment;
mod theme;
mod summary;
mod job;
mod report;

pub use comment::*;
pub use sentiment::*;
pub use theme::*;
pub use summary::*;
pub use job::*;
pub use report::*;
