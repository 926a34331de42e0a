//! Analysis Pipeline
//!
//! ## 5-Stage Sequence
//!
//! ```text
//! CACHE:   Reuse a result for the same source younger than the TTL
//! FETCH:   Load the requested comments, dropping ones already filtered
//! STAGE 1: Preprocessing  (weight 0.20)
//! STAGE 2: Sentiment      (weight 0.30)
//! STAGE 3: Themes         (weight 0.30)
//! STAGE 4: Summary        (weight 0.15)
//! STAGE 5: Persistence    (weight 0.05, one atomic write)
//! ```
//!
//! Stages run strictly in sequence. A progress record goes to the job-status
//! store after each one. Any error marks the job FAILED and nothing is
//! persisted.

mod orchestrator;
mod prerequisites;

pub use orchestrator::{AnalysisRequest, PipelineOrchestrator, PipelineRun, RunStats};
pub use prerequisites::{validate_prerequisites, PrerequisiteError};

use crate::config::defaults::{ESTIMATE_BASE_SECS, ESTIMATE_MAX_SECS, ESTIMATE_PER_COMMENT_SECS};
use crate::storage::StoreError;
use crate::types::PipelineStage;

/// Fatal pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No comments found for analysis")]
    NoComments,
    #[error("Failed to fetch comments: {0}")]
    Fetch(#[source] StoreError),
    #[error("Failed to persist analysis: {0}")]
    Persistence(#[source] StoreError),
    #[error("Analysis cancelled before {stage} stage")]
    Cancelled { stage: PipelineStage },
}

/// Estimated run time in seconds: `10 + 0.1 * count`, capped at 300
pub fn estimate_analysis_time(comment_count: usize) -> f64 {
    (ESTIMATE_BASE_SECS + ESTIMATE_PER_COMMENT_SECS * comment_count as f64).min(ESTIMATE_MAX_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_analysis_time() {
        assert_eq!(estimate_analysis_time(0), 10.0);
        assert!((estimate_analysis_time(100) - 20.0).abs() < 1e-9);
        assert_eq!(estimate_analysis_time(2_900), 300.0);
        assert_eq!(estimate_analysis_time(1_000_000), 300.0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(PipelineError::NoComments.to_string(), "No comments found for analysis");
        let cancelled = PipelineError::Cancelled { stage: PipelineStage::Themes };
        assert_eq!(cancelled.to_string(), "Analysis cancelled before themes stage");
    }
}
