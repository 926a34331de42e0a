//! Analysis Configuration - every pipeline tunable as a TOML value
//!
//! Each struct implements `Default` with values from `defaults`, so a missing
//! or empty config file behaves exactly like the built-in constants.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults::*;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "COMMENT_INSIGHTS_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "insights_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the analysis pipeline.
///
/// Load with `AnalysisConfig::load()` which searches:
/// 1. `$COMMENT_INSIGHTS_CONFIG`
/// 2. `./insights_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,

    #[serde(default)]
    pub sentiment: SentimentConfig,

    #[serde(default)]
    pub themes: ThemeConfig,

    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl AnalysisConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded analysis config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded analysis config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings and otherwise ignored.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        for w in super::validation::validate_suspicious_values(&config) {
            warn!("{}", w);
        }
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Analysis config saved");
        Ok(())
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - Ratios and similarity thresholds must lie in [0, 1]
    /// - Batch size, retries and cluster limits must be > 0
    /// - Summary word range must be non-empty
    /// - Stage weights must sum to approximately 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let p = &self.preprocessing;
        Self::check_unit("preprocessing.caps_ratio_threshold", p.caps_ratio_threshold, &mut errors);
        Self::check_unit("preprocessing.repeated_token_ratio", p.repeated_token_ratio, &mut errors);
        Self::check_unit("preprocessing.special_char_ratio", p.special_char_ratio, &mut errors);
        Self::check_unit(
            "preprocessing.duplicate_similarity_threshold",
            p.duplicate_similarity_threshold,
            &mut errors,
        );
        if p.min_length >= p.max_length {
            errors.push(format!(
                "preprocessing.min_length ({}) must be < max_length ({})",
                p.min_length, p.max_length
            ));
        }
        if p.repeated_char_run < 2 {
            errors.push("preprocessing.repeated_char_run must be >= 2".to_string());
        }

        let s = &self.sentiment;
        if s.batch_size == 0 {
            errors.push("sentiment.batch_size must be > 0".to_string());
        }
        if s.max_retries == 0 {
            errors.push("sentiment.max_retries must be > 0".to_string());
        }
        if s.request_timeout_secs == 0 {
            errors.push("sentiment.request_timeout_secs must be > 0".to_string());
        }
        if !s.rate_limit_multiplier.is_finite() || s.rate_limit_multiplier < 1.0 {
            errors.push(format!(
                "sentiment.rate_limit_multiplier ({}) must be a finite value >= 1.0",
                s.rate_limit_multiplier
            ));
        }
        Self::check_unit("sentiment.low_confidence_threshold", s.low_confidence_threshold, &mut errors);
        Self::check_unit("sentiment.quality_warning_threshold", s.quality_warning_threshold, &mut errors);

        let t = &self.themes;
        if t.min_cluster_size == 0 {
            errors.push("themes.min_cluster_size must be > 0".to_string());
        }
        if t.max_clusters == 0 {
            errors.push("themes.max_clusters must be > 0".to_string());
        }
        Self::check_unit("themes.similarity_threshold", t.similarity_threshold, &mut errors);

        let sm = &self.summary;
        if sm.max_retries == 0 {
            errors.push("summary.max_retries must be > 0".to_string());
        }
        if sm.min_words > sm.max_words {
            errors.push(format!(
                "summary.min_words ({}) must be <= max_words ({})",
                sm.min_words, sm.max_words
            ));
        }
        Self::check_unit("summary.min_quality_score", sm.min_quality_score, &mut errors);
        Self::check_unit(
            "summary.dominant_sentiment_threshold",
            sm.dominant_sentiment_threshold,
            &mut errors,
        );
        Self::check_unit("summary.high_filter_rate", sm.high_filter_rate, &mut errors);
        Self::check_unit("summary.moderation_filter_rate", sm.moderation_filter_rate, &mut errors);

        let w = &self.pipeline.stage_weights;
        let weight_sum = w.sum();
        if !weight_sum.is_finite() || (weight_sum - 1.0).abs() > 0.01 {
            errors.push(format!("pipeline.stage_weights must sum to 1.0, got {:.3}", weight_sum));
        }
        if !(0..=MAX_CACHE_TTL_HOURS).contains(&self.pipeline.cache_ttl_hours) {
            errors.push(format!(
                "pipeline.cache_ttl_hours ({}) must be within 0-{}",
                self.pipeline.cache_ttl_hours, MAX_CACHE_TTL_HOURS
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            errors.push(format!("llm.temperature ({}) must be within 0-2", self.llm.temperature));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_unit(name: &str, value: f64, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, so check finiteness first
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            errors.push(format!("{name} ({value}) must be within 0-1"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Preprocessing
// ============================================================================

/// Spam, toxicity and duplicate detection thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_caps_ratio")]
    pub caps_ratio_threshold: f64,
    #[serde(default = "default_repeated_char_run")]
    pub repeated_char_run: usize,
    #[serde(default = "default_repeated_token_ratio")]
    pub repeated_token_ratio: f64,
    #[serde(default = "default_special_char_ratio")]
    pub special_char_ratio: f64,
    #[serde(default = "default_duplicate_similarity")]
    pub duplicate_similarity_threshold: f64,
}

fn default_min_length() -> usize { MIN_COMMENT_LENGTH }
fn default_max_length() -> usize { MAX_COMMENT_LENGTH }
fn default_caps_ratio() -> f64 { CAPS_RATIO_THRESHOLD }
fn default_repeated_char_run() -> usize { REPEATED_CHAR_RUN }
fn default_repeated_token_ratio() -> f64 { REPEATED_TOKEN_RATIO }
fn default_special_char_ratio() -> f64 { SPECIAL_CHAR_RATIO }
fn default_duplicate_similarity() -> f64 { DUPLICATE_SIMILARITY_THRESHOLD }

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            caps_ratio_threshold: default_caps_ratio(),
            repeated_char_run: default_repeated_char_run(),
            repeated_token_ratio: default_repeated_token_ratio(),
            special_char_ratio: default_special_char_ratio(),
            duplicate_similarity_threshold: default_duplicate_similarity(),
        }
    }
}

// ============================================================================
// Sentiment
// ============================================================================

/// Batching, retry and validation settings for sentiment classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_rate_limit_multiplier")]
    pub rate_limit_multiplier: f64,
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_inter_batch_delay_ms")]
    pub inter_batch_delay_ms: u64,
    /// Re-submit low-confidence results one comment at a time
    #[serde(default)]
    pub advanced_mode: bool,
    #[serde(default = "default_low_confidence")]
    pub low_confidence_threshold: f64,
    #[serde(default = "default_sentiment_quality_warning")]
    pub quality_warning_threshold: f64,
}

fn default_batch_size() -> usize { SENTIMENT_BATCH_SIZE }
fn default_max_retries() -> u32 { LLM_MAX_RETRIES }
fn default_base_delay_ms() -> u64 { LLM_BASE_DELAY_MS }
fn default_rate_limit_multiplier() -> f64 { LLM_RATE_LIMIT_MULTIPLIER }
fn default_max_jitter_ms() -> u64 { LLM_MAX_JITTER_MS }
fn default_request_timeout_secs() -> u64 { LLM_REQUEST_TIMEOUT_SECS }
fn default_inter_batch_delay_ms() -> u64 { INTER_BATCH_DELAY_MS }
fn default_low_confidence() -> f64 { LOW_CONFIDENCE_THRESHOLD }
fn default_sentiment_quality_warning() -> f64 { SENTIMENT_QUALITY_WARNING }

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            rate_limit_multiplier: default_rate_limit_multiplier(),
            max_jitter_ms: default_max_jitter_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            inter_batch_delay_ms: default_inter_batch_delay_ms(),
            advanced_mode: false,
            low_confidence_threshold: default_low_confidence(),
            quality_warning_threshold: default_sentiment_quality_warning(),
        }
    }
}

// ============================================================================
// Themes
// ============================================================================

/// Keyword extraction and clustering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
    #[serde(default = "default_max_clusters")]
    pub max_clusters: usize,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
    #[serde(default = "default_small_corpus_limit")]
    pub small_corpus_limit: usize,
}

fn default_min_cluster_size() -> usize { MIN_CLUSTER_SIZE }
fn default_max_clusters() -> usize { MAX_CLUSTERS }
fn default_similarity_threshold() -> f64 { CLUSTER_SIMILARITY_THRESHOLD }
fn default_max_keywords() -> usize { MAX_KEYWORDS }
fn default_small_corpus_limit() -> usize { SMALL_CORPUS_LIMIT }

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: default_min_cluster_size(),
            max_clusters: default_max_clusters(),
            similarity_threshold: default_similarity_threshold(),
            max_keywords: default_max_keywords(),
            small_corpus_limit: default_small_corpus_limit(),
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Narrative generation, validation and rule-template thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_summary_retries")]
    pub max_retries: u32,
    #[serde(default = "default_summary_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_min_words")]
    pub min_words: usize,
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default = "default_min_characters")]
    pub min_characters: usize,
    #[serde(default = "default_min_quality")]
    pub min_quality_score: f64,
    #[serde(default = "default_dominant_threshold")]
    pub dominant_sentiment_threshold: f64,
    #[serde(default = "default_high_filter_rate")]
    pub high_filter_rate: f64,
    #[serde(default = "default_moderation_filter_rate")]
    pub moderation_filter_rate: f64,
    #[serde(default = "default_low_engagement")]
    pub low_engagement_comments: usize,
}

fn default_summary_retries() -> u32 { SUMMARY_MAX_RETRIES }
fn default_summary_retry_delay_ms() -> u64 { SUMMARY_RETRY_DELAY_MS }
fn default_min_words() -> usize { SUMMARY_MIN_WORDS }
fn default_max_words() -> usize { SUMMARY_MAX_WORDS }
fn default_min_characters() -> usize { SUMMARY_MIN_CHARACTERS }
fn default_min_quality() -> f64 { SUMMARY_MIN_QUALITY }
fn default_dominant_threshold() -> f64 { DOMINANT_SENTIMENT_THRESHOLD }
fn default_high_filter_rate() -> f64 { HIGH_FILTER_RATE }
fn default_moderation_filter_rate() -> f64 { MODERATION_FILTER_RATE }
fn default_low_engagement() -> usize { LOW_ENGAGEMENT_COMMENTS }

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_summary_retries(),
            retry_delay_ms: default_summary_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            min_words: default_min_words(),
            max_words: default_max_words(),
            min_characters: default_min_characters(),
            min_quality_score: default_min_quality(),
            dominant_sentiment_threshold: default_dominant_threshold(),
            high_filter_rate: default_high_filter_rate(),
            moderation_filter_rate: default_moderation_filter_rate(),
            low_engagement_comments: default_low_engagement(),
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Orchestrator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: i64,
    #[serde(default = "default_min_comments")]
    pub min_comments_for_analysis: usize,
    #[serde(default)]
    pub stage_weights: StageWeights,
}

fn default_cache_ttl_hours() -> i64 { CACHE_TTL_HOURS }
fn default_min_comments() -> usize { MIN_COMMENTS_FOR_ANALYSIS }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: default_cache_ttl_hours(),
            min_comments_for_analysis: default_min_comments(),
            stage_weights: StageWeights::default(),
        }
    }
}

/// Share of overall progress contributed by each stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageWeights {
    #[serde(default = "default_w_preprocessing")]
    pub preprocessing: f64,
    #[serde(default = "default_w_sentiment")]
    pub sentiment: f64,
    #[serde(default = "default_w_themes")]
    pub themes: f64,
    #[serde(default = "default_w_summary")]
    pub summary: f64,
    #[serde(default = "default_w_persistence")]
    pub persistence: f64,
}

fn default_w_preprocessing() -> f64 { 0.20 }
fn default_w_sentiment() -> f64 { 0.30 }
fn default_w_themes() -> f64 { 0.30 }
fn default_w_summary() -> f64 { 0.15 }
fn default_w_persistence() -> f64 { 0.05 }

impl Default for StageWeights {
    fn default() -> Self {
        Self {
            preprocessing: default_w_preprocessing(),
            sentiment: default_w_sentiment(),
            themes: default_w_themes(),
            summary: default_w_summary(),
            persistence: default_w_persistence(),
        }
    }
}

impl StageWeights {
    pub fn sum(&self) -> f64 {
        self.preprocessing + self.sentiment + self.themes + self.summary + self.persistence
    }

    /// Weight of a single stage
    pub fn weight(&self, stage: crate::types::PipelineStage) -> f64 {
        use crate::types::PipelineStage;
        match stage {
            PipelineStage::Preprocessing => self.preprocessing,
            PipelineStage::Sentiment => self.sentiment,
            PipelineStage::Themes => self.themes,
            PipelineStage::Summary => self.summary,
            PipelineStage::Persistence => self.persistence,
        }
    }

    /// Cumulative progress (0-100) once `stage` has completed
    pub fn cumulative_progress(&self, stage: crate::types::PipelineStage) -> f64 {
        let total: f64 = crate::types::PipelineStage::ALL
            .iter()
            .take_while(|s| s.step() <= stage.step())
            .map(|s| self.weight(*s))
            .sum();
        (total * 100.0).min(100.0)
    }
}

// ============================================================================
// LLM Endpoint
// ============================================================================

/// Generative text endpoint. Without an `endpoint` every stage runs on fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String { DEFAULT_LLM_MODEL.to_string() }
fn default_api_key_env() -> String { DEFAULT_API_KEY_ENV.to_string() }
fn default_temperature() -> f64 { DEFAULT_LLM_TEMPERATURE }
fn default_max_tokens() -> u32 { DEFAULT_LLM_MAX_TOKENS }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}
