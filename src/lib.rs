//! Comment Insights: social-media comment analysis
//!
//! ## Architecture
//!
//! - **Preprocessor**: rule-based spam, toxicity and duplicate filtering
//! - **Sentiment Analyzer**: batched LLM classification with retry and a
//!   rule-based fallback
//! - **Theme Analyzer**: TF-IDF keywords and Jaccard clustering
//! - **Summary Generator**: narrative summary, emotions, insights and
//!   recommendations with self-validation
//! - **Pipeline**: cache-aware, progress-tracked orchestration with atomic
//!   persistence

pub mod config;
pub mod llm;
pub mod pipeline;
pub mod preprocess;
pub mod sentiment;
pub mod storage;
pub mod summary;
pub mod themes;
pub mod types;

// Re-export configuration
pub use config::AnalysisConfig;

// Re-export commonly used types
pub use types::{
    AnalysisResult, Comment, GeneratedSummary, JobProgress, JobStatus, KeywordData,
    PipelineStage, PreprocessedComment, Sentiment, SentimentBreakdown, SentimentResult,
    StoredAnalysis, ThemeAnalysis, ThemeCluster,
};

// Re-export analysis components
pub use preprocess::{CommentPreprocessor, PreprocessingResult, PreprocessingStats};
pub use sentiment::{SentimentAnalysis, SentimentAnalyzer, SentimentStats};
pub use summary::{SummaryGenerator, SummaryInput};
pub use themes::{ThemeAnalyzer, ThemeOverrides};

// Re-export LLM components
pub use llm::{build_backend, DisabledBackend, HttpLlmBackend, LlmBackend, LlmError};

// Re-export pipeline and storage
pub use pipeline::{
    estimate_analysis_time, validate_prerequisites, AnalysisRequest, PipelineError,
    PipelineOrchestrator, PipelineRun, PrerequisiteError,
};
pub use storage::{InMemoryStore, SledStore, StoreError};
