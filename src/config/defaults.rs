//! System-wide default constants.
//!
//! Every tunable in `AnalysisConfig` falls back to one of these values.
//! Grouped by pipeline stage for easy discovery.

// ============================================================================
// Preprocessing
// ============================================================================

/// Comments shorter than this (characters) are spam.
pub const MIN_COMMENT_LENGTH: usize = 3;

/// Comments longer than this (characters) are spam.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Uppercase share of letters above which a comment is shouting spam.
pub const CAPS_RATIO_THRESHOLD: f64 = 0.7;

/// A run of the same character at least this long is repetitive spam.
pub const REPEATED_CHAR_RUN: usize = 5;

/// A repeated token occupying more than this share of words is repetitive spam.
pub const REPEATED_TOKEN_RATIO: f64 = 0.3;

/// Emoji / special character share of non-whitespace characters above which a comment is spam.
pub const SPECIAL_CHAR_RATIO: f64 = 0.5;

/// Jaccard similarity above which a later comment is a duplicate.
pub const DUPLICATE_SIMILARITY_THRESHOLD: f64 = 0.9;

// ============================================================================
// Sentiment
// ============================================================================

/// Comments per LLM prompt.
pub const SENTIMENT_BATCH_SIZE: usize = 10;

/// Attempts per batch before falling back.
pub const LLM_MAX_RETRIES: u32 = 3;

/// Base backoff delay (ms). Attempt `n` (0-based) waits `base * 2^n + jitter`.
pub const LLM_BASE_DELAY_MS: u64 = 1_000;

/// Backoff multiplier applied when the failure is a rate limit.
pub const LLM_RATE_LIMIT_MULTIPLIER: f64 = 5.0;

/// Upper bound of the random jitter added to each backoff (ms).
pub const LLM_MAX_JITTER_MS: u64 = 1_000;

/// Hard timeout raced against every LLM call (seconds).
pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pause between consecutive sentiment batches (ms).
pub const INTER_BATCH_DELAY_MS: u64 = 500;

/// Results below this confidence are re-submitted in advanced mode.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Batch quality score below which a validation warning is logged.
pub const SENTIMENT_QUALITY_WARNING: f64 = 0.7;

// ============================================================================
// Themes
// ============================================================================

pub const MIN_CLUSTER_SIZE: usize = 2;
pub const MAX_CLUSTERS: usize = 10;

/// Minimum Jaccard similarity for greedy cluster membership.
pub const CLUSTER_SIMILARITY_THRESHOLD: f64 = 0.15;

pub const MAX_KEYWORDS: usize = 50;

/// Corpora at or below this size keep singleton themes.
pub const SMALL_CORPUS_LIMIT: usize = 6;

// ============================================================================
// Summary
// ============================================================================

pub const SUMMARY_MAX_RETRIES: u32 = 3;

/// Linear backoff step between summary attempts (ms).
pub const SUMMARY_RETRY_DELAY_MS: u64 = 1_000;

pub const SUMMARY_MIN_WORDS: usize = 75;
pub const SUMMARY_MAX_WORDS: usize = 150;
pub const SUMMARY_MIN_CHARACTERS: usize = 100;

/// Quality score below which a generated summary is rejected and retried.
pub const SUMMARY_MIN_QUALITY: f64 = 0.6;

/// Quality score assigned to the deterministic template summary.
pub const TEMPLATE_SUMMARY_QUALITY: f64 = 0.4;

/// Quality score assigned to the fixed empty-input summary.
pub const EMPTY_SUMMARY_QUALITY: f64 = 0.5;

/// Sentiment share above which a dominant-sentiment insight is emitted.
pub const DOMINANT_SENTIMENT_THRESHOLD: f64 = 0.6;

/// Filter rate above which a high-filter-rate insight is emitted.
pub const HIGH_FILTER_RATE: f64 = 0.2;

/// Filter rate above which a moderation recommendation is emitted.
pub const MODERATION_FILTER_RATE: f64 = 0.3;

/// Valid-comment count below which an engagement recommendation is emitted.
pub const LOW_ENGAGEMENT_COMMENTS: usize = 10;

// ============================================================================
// Pipeline
// ============================================================================

/// Cached results younger than this are reused.
pub const CACHE_TTL_HOURS: i64 = 24;

/// Longest accepted result cache lifetime (one year)
pub const MAX_CACHE_TTL_HOURS: i64 = 24 * 365;

/// Minimum valid comments required by prerequisite validation.
pub const MIN_COMMENTS_FOR_ANALYSIS: usize = 5;

/// Estimated seconds = base + per_comment * count, capped.
pub const ESTIMATE_BASE_SECS: f64 = 10.0;
pub const ESTIMATE_PER_COMMENT_SECS: f64 = 0.1;
pub const ESTIMATE_MAX_SECS: f64 = 300.0;

// ============================================================================
// LLM Endpoint
// ============================================================================

pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_KEY_ENV: &str = "COMMENT_INSIGHTS_API_KEY";
pub const DEFAULT_LLM_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 1_024;
