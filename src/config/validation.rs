//! Config validation: unknown-key detection with Levenshtein suggestions
//! and plausibility checks.
//!
//! Two-pass parse: first the raw TOML is read into `toml::Value`, the key
//! tree is walked and compared against known field names, and warnings with
//! "did you mean?" suggestions are emitted. Normal serde deserialization
//! follows. Warnings never reject a config.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for AnalysisConfig.
///
/// Maintained by hand to match analysis_config.rs. New fields go here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [preprocessing]
        "preprocessing",
        "preprocessing.min_length",
        "preprocessing.max_length",
        "preprocessing.caps_ratio_threshold",
        "preprocessing.repeated_char_run",
        "preprocessing.repeated_token_ratio",
        "preprocessing.special_char_ratio",
        "preprocessing.duplicate_similarity_threshold",
        // [sentiment]
        "sentiment",
        "sentiment.batch_size",
        "sentiment.max_retries",
        "sentiment.base_delay_ms",
        "sentiment.rate_limit_multiplier",
        "sentiment.max_jitter_ms",
        "sentiment.request_timeout_secs",
        "sentiment.inter_batch_delay_ms",
        "sentiment.advanced_mode",
        "sentiment.low_confidence_threshold",
        "sentiment.quality_warning_threshold",
        // [themes]
        "themes",
        "themes.min_cluster_size",
        "themes.max_clusters",
        "themes.similarity_threshold",
        "themes.max_keywords",
        "themes.small_corpus_limit",
        // [summary]
        "summary",
        "summary.max_retries",
        "summary.retry_delay_ms",
        "summary.request_timeout_secs",
        "summary.min_words",
        "summary.max_words",
        "summary.min_characters",
        "summary.min_quality_score",
        "summary.dominant_sentiment_threshold",
        "summary.high_filter_rate",
        "summary.moderation_filter_rate",
        "summary.low_engagement_comments",
        // [pipeline]
        "pipeline",
        "pipeline.cache_ttl_hours",
        "pipeline.min_comments_for_analysis",
        "pipeline.stage_weights",
        "pipeline.stage_weights.preprocessing",
        "pipeline.stage_weights.sentiment",
        "pipeline.stage_weights.themes",
        "pipeline.stage_weights.summary",
        "pipeline.stage_weights.persistence",
        // [llm]
        "llm",
        "llm.endpoint",
        "llm.model",
        "llm.api_key_env",
        "llm.temperature",
        "llm.max_tokens",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Edit distance between two strings, counted in chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (*k, levenshtein(unknown, k)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by(|(ka, da), (kb, db)| da.cmp(db).then_with(|| ka.cmp(kb)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails on unknown keys. Parse errors are left to serde.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Plausibility Checks
// ============================================================================

/// Flag values that are legal but probably a mistake.
pub fn validate_suspicious_values(config: &super::AnalysisConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |field: &str, message: String| {
        warnings.push(ValidationWarning {
            field: field.to_string(),
            message,
            suggestion: None,
        });
    };

    if config.sentiment.batch_size > 50 {
        warn(
            "sentiment.batch_size",
            format!(
                "sentiment.batch_size = {} is large; long prompts tend to lose per-comment results",
                config.sentiment.batch_size
            ),
        );
    }
    if config.themes.similarity_threshold > 0.8 {
        warn(
            "themes.similarity_threshold",
            format!(
                "themes.similarity_threshold = {:.2} will leave almost every comment unclustered",
                config.themes.similarity_threshold
            ),
        );
    }
    if config.preprocessing.duplicate_similarity_threshold < 0.5 {
        warn(
            "preprocessing.duplicate_similarity_threshold",
            format!(
                "preprocessing.duplicate_similarity_threshold = {:.2} marks loosely related comments as duplicates",
                config.preprocessing.duplicate_similarity_threshold
            ),
        );
    }
    if config.pipeline.cache_ttl_hours == 0 {
        warn(
            "pipeline.cache_ttl_hours",
            "pipeline.cache_ttl_hours = 0 disables result caching".to_string(),
        );
    }
    if config.llm.endpoint.is_none() {
        warn(
            "llm.endpoint",
            "llm.endpoint is not set; every stage will use rule-based fallbacks".to_string(),
        );
    }

    warnings
}

// ============================================================================
// Tests
// ============================================================================
