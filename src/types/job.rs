//! Job types: JobStatus, PipelineStage, JobProgress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of pipeline stages reported in progress updates
pub const TOTAL_STEPS: u8 = 5;

/// Lifecycle of an analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// COMPLETED and FAILED are terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "PENDING"),
            JobStatus::Processing => write!(f, "PROCESSING"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// The five sequential pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Preprocessing,
    Sentiment,
    Themes,
    Summary,
    Persistence,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Preprocessing,
        PipelineStage::Sentiment,
        PipelineStage::Themes,
        PipelineStage::Summary,
        PipelineStage::Persistence,
    ];

    /// 1-based step index
    pub fn step(&self) -> u8 {
        match self {
            PipelineStage::Preprocessing => 1,
            PipelineStage::Sentiment => 2,
            PipelineStage::Themes => 3,
            PipelineStage::Summary => 4,
            PipelineStage::Persistence => 5,
        }
    }

    /// Human-readable description emitted once the stage completes
    pub fn description(&self) -> &'static str {
        match self {
            PipelineStage::Preprocessing => "Preprocessing and filtering comments",
            PipelineStage::Sentiment => "Analyzing comment sentiment",
            PipelineStage::Themes => "Extracting keywords and themes",
            PipelineStage::Summary => "Generating narrative summary",
            PipelineStage::Persistence => "Saving analysis results",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Preprocessing => write!(f, "preprocessing"),
            PipelineStage::Sentiment => write!(f, "sentiment"),
            PipelineStage::Themes => write!(f, "themes"),
            PipelineStage::Summary => write!(f, "summary"),
            PipelineStage::Persistence => write!(f, "persistence"),
        }
    }
}

/// Progress record pushed to the job-status store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    pub job_id: String,
    pub status: JobStatus,
    /// Cumulative stage weight x 100
    pub progress: f64,
    pub current_step: u8,
    pub total_steps: u8,
    pub step_description: String,
    #[serde(default)]
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl JobProgress {
    /// Fresh record for a job that is about to run
    pub fn started(job_id: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            status: JobStatus::Processing,
            progress: 0.0,
            current_step: 0,
            total_steps: TOTAL_STEPS,
            step_description: "Starting analysis".to_string(),
            error: None,
            updated_at: Utc::now(),
        }
    }

    /// Record completion of `stage` with cumulative progress
    pub fn advance(&mut self, stage: PipelineStage, progress: f64) {
        self.current_step = stage.step();
        self.progress = progress.clamp(0.0, 100.0);
        self.step_description = stage.description().to_string();
        self.updated_at = Utc::now();
    }

    pub fn complete(&mut self, description: &str) {
        self.status = JobStatus::Completed;
        self.progress = 100.0;
        self.current_step = TOTAL_STEPS;
        self.step_description = description.to_string();
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self, message: &str) {
        self.status = JobStatus::Failed;
        self.error = Some(message.to_string());
        self.step_description = format!("Analysis failed: {message}");
        self.updated_at = Utc::now();
    }
}
